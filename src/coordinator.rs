//! Run coordinator orchestrating one assignment pass.
//!
//! The coordinator handles:
//! - building the (cached) full-text building catalog
//! - resolving the operator's building query to one building
//! - loading the (cached) conference-room list for that building
//! - fetching free/busy data concurrently with event enumeration
//! - running the assignment engine and returning the operator report

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::assign::{needs_room, AssignmentEngine, AssignmentReport};
use crate::cache::CacheSpace;
use crate::calendar::{fetch_free_busy, Event};
use crate::catalog::{build_catalog, resolve_building, resources_in_building, BuildingIndex};
use crate::config::Config;
use crate::error::Result;
use crate::interval::Interval;
use crate::sources::{CalendarWriter, DirectorySource, EventSource, FreeBusySource};

/// Orchestrates one end-to-end assignment run.
pub struct Coordinator {
    config: Config,
    directory: Arc<dyn DirectorySource>,
    events: Arc<dyn EventSource>,
    free_busy: Arc<dyn FreeBusySource>,
    writer: Arc<dyn CalendarWriter>,
    cache: CacheSpace,
}

impl Coordinator {
    pub fn new(
        config: Config,
        directory: Arc<dyn DirectorySource>,
        events: Arc<dyn EventSource>,
        free_busy: Arc<dyn FreeBusySource>,
        writer: Arc<dyn CalendarWriter>,
        cache: CacheSpace,
    ) -> Self {
        Self {
            config,
            directory,
            events,
            free_busy,
            writer,
            cache,
        }
    }

    /// Assign rooms to every qualifying event in `window`.
    pub async fn run(&self, window: Interval) -> Result<AssignmentReport> {
        let max_age = Duration::from_secs(self.config.cache.max_age_days * 24 * 3600);

        let index = self
            .cache
            .get_or_create(
                "buildings",
                max_age,
                |dir| async move { BuildingIndex::open(&dir) },
                |dir| async move {
                    let index = BuildingIndex::create(&dir)?;
                    let indexed = build_catalog(&index, self.directory.as_ref()).await?;
                    info!(buildings = indexed, "building catalog rebuilt");
                    Ok(index)
                },
            )
            .await?;

        let building_id = resolve_building(&index, &self.config.run.building)?;
        info!(building = %building_id, "inferred building");

        let mut resources = resources_in_building(
            &self.cache,
            self.directory.as_ref(),
            &building_id,
            max_age,
        )
        .await?;
        // sorted by email so existing bookings can be found by binary search
        resources.sort_by(|a, b| a.email.cmp(&b.email));
        info!(rooms = resources.len(), "resource catalog loaded");

        let chunk_size = self.config.free_busy.chunk_size;
        let (free_busy, events) = tokio::try_join!(
            fetch_free_busy(self.free_busy.as_ref(), &resources, window, chunk_size),
            self.collect_events(window),
        )?;
        info!(
            events = events.len(),
            calendars = free_busy.len(),
            "inputs ready, assigning"
        );

        let engine = AssignmentEngine::new(
            self.writer.as_ref(),
            &self.config.run.calendar_id,
            self.config.preferred_location(),
            self.config.run.dry_run,
        );
        engine.run(&events, &resources, &free_busy).await
    }

    /// Enumerate and classify the events that need a room, in order.
    async fn collect_events(&self, window: Interval) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        self.events
            .for_each_event(
                &self.config.run.calendar_id,
                window,
                Box::new(|event| {
                    if needs_room(&event) {
                        events.push(event);
                    }
                    Box::pin(async { Ok(()) })
                }),
            )
            .await?;
        Ok(events)
    }
}
