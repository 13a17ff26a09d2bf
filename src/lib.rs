//! Usher: automatic meeting-room assignment for calendar events.
//!
//! Usher scans a calendar for events that need a physical room, ranks the
//! building's conference rooms by floor/section distance from the rooms of
//! neighboring events, and books the nearest room whose free/busy schedule
//! has no conflict.

pub mod assign;
pub mod batch;
pub mod cache;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod directory;
pub mod error;
pub mod interval;
pub mod sources;

pub use assign::{AssignmentEngine, AssignmentReport, Outcome, ReportEntry};
pub use cache::CacheSpace;
pub use calendar::{Attendee, BusyCalendar, Event, EventPatch, FreeBusyResponse};
pub use catalog::{resolve_building, BuildingIndex};
pub use config::Config;
pub use coordinator::Coordinator;
pub use directory::{Building, Location, Resource, ResourceCategory};
pub use error::{Result, UsherError};
pub use interval::{Interval, IntervalMap};
pub use sources::{
    CalendarWriter, DirectorySource, EventSource, FreeBusySource, RecordingWriter,
    SnapshotSource,
};
