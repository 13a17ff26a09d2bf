//! Event classification and pre-existing booking detection.

use crate::calendar::{Event, EventStatus, ResponseStatus, Transparency};
use crate::directory::Resource;

/// Whether an event should go through the assignment pass at all.
///
/// All-day, cancelled and non-blocking events never need a room. An explicit
/// room marker in the text always qualifies the event; otherwise it takes
/// strictly more than one human attendee who has not declined, and the
/// calendar owner must not have declined or left the invitation unanswered.
pub fn needs_room(event: &Event) -> bool {
    if event.all_day
        || event.status == EventStatus::Cancelled
        || event.transparency == Transparency::Transparent
    {
        return false;
    }
    if event.wants_room() {
        return true;
    }
    let mut humans = 0;
    for attendee in &event.attendees {
        if attendee.is_self
            && matches!(
                attendee.response_status,
                ResponseStatus::Declined | ResponseStatus::NeedsAction
            )
        {
            return false;
        }
        if !attendee.is_resource && attendee.response_status != ResponseStatus::Declined {
            humans += 1;
        }
    }
    humans > 1
}

/// The index into `catalog` of a room this event already has, if any.
///
/// `catalog` must be sorted by email. Only an accepted resource attendee
/// that resolves to a conference room counts; the last such match wins.
pub fn preassigned_room(event: &Event, catalog: &[Resource]) -> Option<usize> {
    let mut found = None;
    for attendee in &event.attendees {
        if !attendee.is_resource || attendee.response_status != ResponseStatus::Accepted {
            continue;
        }
        if let Ok(at) = catalog.binary_search_by(|r| r.email.as_str().cmp(&attendee.email)) {
            if catalog[at].is_bookable() {
                found = Some(at);
            }
        }
    }
    found
}
