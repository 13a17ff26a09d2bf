//! Greedy room assignment.
//!
//! Events are processed in one forward chronological scan; each unassigned
//! event gets the nearest free room relative to the rooms of its neighboring
//! events. The result is locally optimal with respect to already-fixed
//! neighboring assignments, not a global minimum-total-distance solution.

mod classify;
mod distance;
mod engine;

pub use classify::{needs_room, preassigned_room};
pub use distance::{distance, MAX_DISTANCE};
pub use engine::{AssignmentEngine, AssignmentReport, Outcome, ReportEntry};
