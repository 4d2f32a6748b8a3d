//! Half-open UTC time intervals and the set operations the resolver is built on.
//!
//! Every interval is `[start, end)` with `start < end`, so two intervals that
//! share a boundary touch without overlapping. All operations are total: empty
//! inputs produce empty outputs.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AvailabilityError;

/// A non-empty half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = AvailabilityError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Build an interval, rejecting empty or inverted ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AvailabilityError> {
        Self::try_new(start, end).ok_or_else(|| {
            AvailabilityError::InvalidInterval(format!(
                "start {} is not before end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            ))
        })
    }

    /// Like [`TimeInterval::new`], but returns `None` for empty ranges.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True when the two intervals share at least one instant.
    /// Adjacent intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Widen the interval by `before` on the left and `after` on the right.
    ///
    /// Negative padding is treated as zero. Padding past the representable
    /// range saturates at `DateTime::<Utc>::MIN_UTC` / `MAX_UTC`.
    pub fn padded(&self, before: Duration, after: Duration) -> TimeInterval {
        let start = self
            .start
            .checked_sub_signed(before.max(Duration::zero()))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let end = self
            .end
            .checked_add_signed(after.max(Duration::zero()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        TimeInterval { start, end }
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Merge overlapping or adjacent intervals.
///
/// Returns the minimal sorted, non-overlapping, non-adjacent set covering the
/// same instants as the input. Input order does not matter.
pub fn merge(intervals: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut sorted = intervals.to_vec();
    sorted.sort();

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// Remove `subtrahends` from `base`, returning the free gaps in order.
///
/// `subtrahends` should be sorted and non-overlapping (the output of
/// [`merge`]). Parts of a subtrahend outside `base` are ignored.
pub fn subtract(base: &TimeInterval, subtrahends: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut gaps = Vec::new();
    let mut cursor = base.start;

    for busy in subtrahends {
        if cursor >= base.end {
            break;
        }
        if let Some(gap) = TimeInterval::try_new(cursor, busy.start.min(base.end)) {
            gaps.push(gap);
        }
        cursor = cursor.max(busy.end);
    }

    // Trailing gap after the last busy period.
    if let Some(gap) = TimeInterval::try_new(cursor, base.end) {
        gaps.push(gap);
    }

    gaps
}

/// The common part of two intervals, or `None` when they do not overlap.
pub fn intersect(a: &TimeInterval, b: &TimeInterval) -> Option<TimeInterval> {
    TimeInterval::try_new(a.start.max(b.start), a.end.min(b.end))
}
