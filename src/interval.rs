//! Half-open time intervals and a sorted interval map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

/// A half-open time range `[start, end)`.
///
/// `start <= end` is not enforced; an inverted interval simply overlaps
/// nothing. Ordering is lexicographic on `(start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create an interval from two timestamps.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Parse an interval from two RFC 3339 timestamp strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_timestamp(start)?,
            end: parse_timestamp(end)?,
        })
    }

    /// Whether two half-open intervals share any instant. An interval that
    /// merely touches another (`a.end == b.start`) does not overlap it.
    pub fn overlaps(&self, other: Interval) -> bool {
        other.start < self.end && self.start < other.end
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| {
            ParseError::Timestamp {
                value: s.to_string(),
                source,
            }
            .into()
        })
}

/// An ordered sequence of `(Interval, V)` pairs, kept sorted by interval
/// ordering across every mutation.
///
/// Insert-only; single writer at a time (enforced by `&mut self`), any
/// number of concurrent readers while no writer is active.
#[derive(Debug)]
pub struct IntervalMap<V> {
    entries: Vec<(Interval, V)>,
}

impl<V> Default for IntervalMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IntervalMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a value at its sorted position. Equal intervals keep insertion
    /// order among themselves.
    pub fn add(&mut self, start: DateTime<Utc>, end: DateTime<Utc>, value: V) {
        let interval = Interval::new(start, end);
        let at = self.entries.partition_point(|(existing, _)| *existing <= interval);
        self.entries.insert(at, (interval, value));
    }

    /// All values whose stored interval fully contains `[start, end)`.
    ///
    /// This is a containment query, not an overlap query. It binary-searches
    /// for the first containing entry and scans forward while containment
    /// holds, which assumes the containing entries form a contiguous run in
    /// sort order; that holds when stored intervals nest rather than
    /// partially overlap around the query range.
    pub fn containing(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&V> {
        let contains = |interval: &Interval| interval.start <= start && end <= interval.end;
        let first = self
            .entries
            .partition_point(|(interval, _)| !contains(interval));
        self.entries[first..]
            .iter()
            .take_while(|(interval, _)| contains(interval))
            .map(|(_, value)| value)
            .collect()
    }

    /// Iterate entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&Interval, &V)> {
        self.entries.iter().map(|(interval, value)| (interval, value))
    }

    /// Consume the map, yielding values in sorted order.
    pub fn into_values(self) -> impl Iterator<Item = V> {
        self.entries.into_iter().map(|(_, value)| value)
    }
}
