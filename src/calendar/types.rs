//! Calendar event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Marker an organizer puts in an event's text to request a room.
pub const ROOM_TAG: &str = "#room";
/// Replacement marker once a room has been booked.
pub const ROOM_TAG_DONE: &str = "#addedroom";

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

/// Whether an event blocks its attendees' time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transparency {
    #[default]
    Opaque,
    Transparent,
}

/// An attendee's reply to an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    #[default]
    NeedsAction,
    Declined,
    Tentative,
    Accepted,
}

/// A participant on an event; either a human or a resource such as a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    #[serde(default)]
    pub response_status: ResponseStatus,
    /// True when this attendee is a calendar resource rather than a person.
    #[serde(default)]
    pub is_resource: bool,
    /// True when this attendee is the calendar's owner.
    #[serde(default)]
    pub is_self: bool,
}

impl Attendee {
    /// The attendee entry used to invite a room.
    pub fn room(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            response_status: ResponseStatus::NeedsAction,
            is_resource: true,
            is_self: false,
        }
    }
}

/// A calendar event as seen by the assignment engine.
///
/// Fields the engine never inspects but must carry into a room-hold copy
/// (conference data, attachments) stay opaque `serde_json::Value`s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub transparency: Transparency,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    /// True when the data source truncated the attendee list; the event
    /// must then be held via a separate room-hold event, never patched.
    #[serde(default)]
    pub attendees_truncated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hangout_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

impl Event {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    /// Whether the organizer asked for a room in the event text.
    pub fn wants_room(&self) -> bool {
        self.summary.contains(ROOM_TAG) || self.description.contains(ROOM_TAG)
    }
}

/// A partial update applied to an existing event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<Attendee>>,
}
