//! Calendar types and free/busy retrieval.

mod freebusy;
mod types;

pub use freebusy::{fetch_free_busy, BusyCalendar, FreeBusyError, FreeBusyResponse, NOT_FOUND};
pub use types::{
    Attendee, Event, EventPatch, EventStatus, ResponseStatus, Transparency, ROOM_TAG,
    ROOM_TAG_DONE,
};
