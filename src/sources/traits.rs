//! Trait definitions for the external data sources the engine consumes.
//!
//! The concrete calendar and directory services live behind these traits;
//! the core only ever sees paginated enumerations, a bulk free/busy lookup,
//! and two write operations.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::calendar::{Event, EventPatch, FreeBusyResponse};
use crate::directory::{Building, Resource};
use crate::error::Result;
use crate::interval::Interval;

/// Visitor invoked once per enumerated item. Returning an error stops the
/// enumeration early and surfaces that error to the caller.
pub type Visitor<'a, T> = Box<dyn FnMut(T) -> BoxFuture<'a, Result<()>> + Send + 'a>;

/// Paginated enumeration of the building/resource directory.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn for_each_building<'a>(&'a self, visit: Visitor<'a, Building>) -> Result<()>;

    /// Enumerate conference-room resources, restricted to one building when
    /// `building_id` is non-empty.
    async fn for_each_resource<'a>(
        &'a self,
        building_id: &'a str,
        visit: Visitor<'a, Resource>,
    ) -> Result<()>;
}

/// Lazy, chronological enumeration of calendar events in a time window.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn for_each_event<'a>(
        &'a self,
        calendar_id: &'a str,
        window: Interval,
        visit: Visitor<'a, Event>,
    ) -> Result<()>;
}

/// Bulk free/busy lookup. Callers chunk the email list themselves to
/// respect upstream request limits.
#[async_trait]
pub trait FreeBusySource: Send + Sync {
    async fn query(&self, emails: &[String], window: Interval) -> Result<FreeBusyResponse>;
}

/// The two calendar mutations bookings need.
#[async_trait]
pub trait CalendarWriter: Send + Sync {
    async fn insert_event(&self, calendar_id: &str, event: &Event) -> Result<()>;

    async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<()>;
}
