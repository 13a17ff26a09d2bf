//! JSON snapshot sources.
//!
//! A snapshot directory holds an exported slice of the upstream services:
//! `buildings.json`, `resources.json`, `events.json` and `freebusy.json`.
//! `SnapshotSource` serves the read traits from those files, which is what
//! the CLI plans against and what the integration tests drive.

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::calendar::{Event, EventPatch, FreeBusyResponse};
use crate::directory::{Building, Resource};
use crate::error::Result;
use crate::interval::{Interval, IntervalMap};
use crate::sources::{CalendarWriter, DirectorySource, EventSource, FreeBusySource, Visitor};

/// Read-only sources backed by a directory of JSON files.
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let file = std::fs::File::open(self.dir.join(name))?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

#[async_trait]
impl DirectorySource for SnapshotSource {
    async fn for_each_building<'a>(&'a self, mut visit: Visitor<'a, Building>) -> Result<()> {
        let buildings: Vec<Building> = self.read_json("buildings.json")?;
        for building in buildings {
            visit(building).await?;
        }
        Ok(())
    }

    async fn for_each_resource<'a>(
        &'a self,
        building_id: &'a str,
        mut visit: Visitor<'a, Resource>,
    ) -> Result<()> {
        let resources: Vec<Resource> = self.read_json("resources.json")?;
        for resource in resources {
            if !resource.is_bookable() {
                continue;
            }
            if !building_id.is_empty() && resource.building_id != building_id {
                continue;
            }
            visit(resource).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EventSource for SnapshotSource {
    async fn for_each_event<'a>(
        &'a self,
        _calendar_id: &'a str,
        window: Interval,
        mut visit: Visitor<'a, Event>,
    ) -> Result<()> {
        let events: Vec<Event> = self.read_json("events.json")?;
        // the live service returns events ordered by start time; impose the
        // same order on the snapshot
        let mut ordered = IntervalMap::new();
        for event in events {
            if window.overlaps(event.interval()) {
                ordered.add(event.start, event.end, event);
            }
        }
        for event in ordered.into_values() {
            visit(event).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl FreeBusySource for SnapshotSource {
    async fn query(&self, emails: &[String], _window: Interval) -> Result<FreeBusyResponse> {
        let mut all: FreeBusyResponse = self.read_json("freebusy.json")?;
        all.calendars.retain(|email, _| emails.contains(email));
        Ok(all)
    }
}

/// A writer that records every mutation instead of performing it.
///
/// Doubles as the dry-run sink: the CLI prints what would have been written.
#[derive(Default)]
pub struct RecordingWriter {
    inserted: Mutex<Vec<(String, Event)>>,
    patched: Mutex<Vec<(String, String, EventPatch)>>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inserted(&self) -> Vec<(String, Event)> {
        self.inserted.lock().clone()
    }

    pub fn patched(&self) -> Vec<(String, String, EventPatch)> {
        self.patched.lock().clone()
    }
}

#[async_trait]
impl CalendarWriter for RecordingWriter {
    async fn insert_event(&self, calendar_id: &str, event: &Event) -> Result<()> {
        info!(calendar = calendar_id, summary = %event.summary, "recording insert");
        self.inserted
            .lock()
            .push((calendar_id.to_string(), event.clone()));
        Ok(())
    }

    async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<()> {
        info!(calendar = calendar_id, event = event_id, "recording patch");
        self.patched
            .lock()
            .push((calendar_id.to_string(), event_id.to_string(), patch.clone()));
        Ok(())
    }
}
