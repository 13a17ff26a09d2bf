//! The assignment pass.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calendar::{Attendee, Event, EventPatch, EventStatus, ROOM_TAG, ROOM_TAG_DONE};
use crate::directory::{Location, Resource};
use crate::error::{AssignError, Result};
use crate::interval::Interval;
use crate::sources::CalendarWriter;

use super::classify::preassigned_room;
use super::distance::distance;

/// Terminal state of one event after the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The event already had a room before the pass.
    AlreadyBooked { room: String },
    /// The pass booked a room.
    Booked { room: String },
    /// Every candidate was busy or unknown; reported, not an error.
    Unassigned,
}

/// One event's line in the operator report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub event_id: String,
    pub summary: String,
    pub outcome: Outcome,
}

/// The result of one assignment run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignmentReport {
    pub entries: Vec<ReportEntry>,
}

impl AssignmentReport {
    pub fn booked(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Booked { .. }))
            .count()
    }

    pub fn unassigned(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == Outcome::Unassigned)
            .count()
    }
}

/// Greedy single-pass room assignment over a chronological event list.
pub struct AssignmentEngine<'w> {
    writer: &'w dyn CalendarWriter,
    calendar_id: String,
    preferred: Option<Location>,
    dry_run: bool,
}

impl<'w> AssignmentEngine<'w> {
    pub fn new(
        writer: &'w dyn CalendarWriter,
        calendar_id: impl Into<String>,
        preferred: Option<Location>,
        dry_run: bool,
    ) -> Self {
        Self {
            writer,
            calendar_id: calendar_id.into(),
            preferred,
            dry_run,
        }
    }

    /// Assign rooms to every event that lacks one.
    ///
    /// `events` must be in chronological order and already classified as
    /// needing a room; `catalog` must be sorted by email. Once an event is
    /// assigned it is never reassigned within the run.
    pub async fn run(
        &self,
        events: &[Event],
        catalog: &[Resource],
        free_busy: &HashMap<String, Vec<Interval>>,
    ) -> Result<AssignmentReport> {
        let mut rooms: Vec<Option<usize>> = events
            .iter()
            .map(|event| preassigned_room(event, catalog))
            .collect();
        let initial = rooms.clone();

        for (event, room) in events.iter().zip(rooms.iter().copied()) {
            let name = room.map(|at| catalog[at].name.as_str()).unwrap_or("(none)");
            let truncated = if event.attendees_truncated { "*" } else { "" };
            info!(room = name, "going to: {}{truncated}", event.summary);
        }

        let mut candidates = Vec::new();
        for (at, resource) in catalog.iter().enumerate() {
            if resource.is_bookable() {
                candidates.push((at, resource.location()?));
            }
        }

        for at in 0..events.len() {
            if rooms[at].is_some() {
                continue;
            }
            let event = &events[at];
            // the previous event may have been assigned earlier in this very
            // pass; the next event can only hold a pre-existing booking
            let prev = at.checked_sub(1).and_then(|p| rooms[p]);
            let next = rooms.get(at + 1).copied().flatten();
            let prev_loc = prev.map(|p| catalog[p].location()).transpose()?;
            let next_loc = next.map(|n| catalog[n].location()).transpose()?;

            let ranked = self.ranked_candidates(&candidates, prev_loc, next_loc)?;
            let mut chosen = None;
            for candidate in ranked {
                let room = &catalog[candidate];
                let Some(busy) = free_busy.get(&room.email) else {
                    warn!(room = %room.email, "no free/busy calendar for candidate, skipping");
                    continue;
                };
                if busy.iter().any(|b| event.interval().overlaps(*b)) {
                    debug!(room = %room.email, event = %event.summary, "candidate busy");
                    continue;
                }
                chosen = Some(candidate);
                break;
            }

            match chosen {
                Some(candidate) => {
                    self.book(event, &catalog[candidate]).await?;
                    rooms[at] = Some(candidate);
                }
                None => info!(event = %event.summary, "no free room"),
            }
        }

        let entries = events
            .iter()
            .enumerate()
            .map(|(at, event)| ReportEntry {
                event_id: event.id.clone(),
                summary: event.summary.clone(),
                outcome: match (initial[at], rooms[at]) {
                    (Some(room), _) => Outcome::AlreadyBooked {
                        room: catalog[room].name.clone(),
                    },
                    (None, Some(room)) => Outcome::Booked {
                        room: catalog[room].name.clone(),
                    },
                    (None, None) => Outcome::Unassigned,
                },
            })
            .collect();
        Ok(AssignmentReport { entries })
    }

    /// Bookable candidates ordered by the distance heuristic.
    fn ranked_candidates(
        &self,
        candidates: &[(usize, Location)],
        prev: Option<Location>,
        next: Option<Location>,
    ) -> Result<Vec<usize>> {
        let rank = |loc: Location| -> Result<u32> {
            if prev.is_none() && next.is_none() {
                let preferred = self
                    .preferred
                    .ok_or(AssignError::NoPreferenceConfigured)?;
                return Ok(distance(Some(preferred), Some(loc)));
            }
            Ok(distance(prev, Some(loc)).min(distance(next, Some(loc))))
        };
        let mut ranked = Vec::with_capacity(candidates.len());
        for (at, loc) in candidates {
            ranked.push((rank(*loc)?, *at));
        }
        // stable sort keeps catalog order among equally distant rooms
        ranked.sort_by_key(|(cost, _)| *cost);
        Ok(ranked.into_iter().map(|(_, at)| at).collect())
    }

    /// Perform the booking writes for a chosen room.
    ///
    /// Marker events and events with a truncated attendee list get a
    /// standalone hold on the calendar instead of an attendee patch; a
    /// truncated list must never be patched back or attendees would be lost.
    async fn book(&self, event: &Event, room: &Resource) -> Result<()> {
        let room_attendee = Attendee::room(&room.email);
        if event.attendees_truncated || event.wants_room() {
            let hold = hold_event(event, room_attendee);
            info!(hold = %hold.summary, room = %room.name, "creating room hold");
            if !self.dry_run {
                self.writer.insert_event(&self.calendar_id, &hold).await?;
            }
            if !event.attendees_truncated {
                info!(event = %event.summary, "clearing room marker");
                let patch = EventPatch {
                    summary: Some(mark_done(&event.summary)),
                    description: Some(mark_done(&event.description)),
                    attendees: None,
                };
                if !self.dry_run {
                    self.writer
                        .patch_event(&self.calendar_id, &event.id, &patch)
                        .await?;
                }
            }
        } else {
            info!(room = %room.name, event = %event.summary, "adding room");
            let mut attendees = event.attendees.clone();
            attendees.push(room_attendee);
            let patch = EventPatch {
                summary: None,
                description: None,
                attendees: Some(attendees),
            };
            if !self.dry_run {
                self.writer
                    .patch_event(&self.calendar_id, &event.id, &patch)
                    .await?;
            }
        }
        Ok(())
    }
}

fn mark_done(text: &str) -> String {
    text.replace(ROOM_TAG, ROOM_TAG_DONE)
}

/// A standalone event holding the room on the organizer's calendar.
fn hold_event(event: &Event, room_attendee: Attendee) -> Event {
    Event {
        id: Uuid::new_v4().to_string(),
        summary: format!("Room for '{}'", mark_done(&event.summary)),
        description: mark_done(&event.description),
        location: event.location.clone(),
        start: event.start,
        end: event.end,
        all_day: false,
        status: EventStatus::Confirmed,
        transparency: event.transparency,
        attendees: vec![room_attendee],
        attendees_truncated: false,
        color_id: event.color_id.clone(),
        conference_data: event.conference_data.clone(),
        attachments: event.attachments.clone(),
        hangout_link: event.hangout_link.clone(),
        visibility: event.visibility.clone(),
    }
}
