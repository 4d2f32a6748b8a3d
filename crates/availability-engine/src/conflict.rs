//! Check a candidate booking against existing bookings and free slots.
//!
//! Bookings are compared with their buffers applied. Adjacent intervals (where
//! one ends exactly when another starts) are NOT conflicts.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interval::TimeInterval;
use crate::rules::ResourceCalendar;
use crate::slots::{compute_availability, Booking, Query};

/// An existing booking that a candidate would collide with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub booking: Booking,
    /// The booking's interval widened by the query's buffers.
    pub occupied: TimeInterval,
    pub overlap_minutes: i64,
}

/// Find every active booking of the query's resource whose padded interval
/// overlaps `candidate`.
///
/// Two intervals overlap when `a.start < b.end && b.start < a.end`; the
/// overlap is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts(
    candidate: &TimeInterval,
    query: &Query,
    bookings: &[Booking],
) -> Vec<Conflict> {
    let mut conflicts: Vec<Conflict> = bookings
        .iter()
        .filter(|b| b.status.occupies_time() && b.resource_id == query.resource_id)
        .filter_map(|b| {
            let occupied = b.interval.padded(query.buffer_before(), query.buffer_after());
            if !occupied.overlaps(candidate) {
                return None;
            }
            let overlap_start = occupied.start().max(candidate.start());
            let overlap_end = occupied.end().min(candidate.end());
            Some(Conflict {
                booking: b.clone(),
                occupied,
                overlap_minutes: (overlap_end - overlap_start).num_minutes(),
            })
        })
        .collect();

    conflicts.sort_by_key(|c| c.occupied);
    conflicts
}

/// True when `candidate` fits entirely inside one free slot for `query`.
///
/// The query's minimum slot duration still applies to the surrounding slot,
/// not to the candidate.
pub fn is_bookable(
    candidate: &TimeInterval,
    query: &Query,
    calendar: &ResourceCalendar,
    bookings: &[Booking],
) -> Result<bool> {
    let slots = compute_availability(query, calendar, bookings)?;
    Ok(slots.iter().any(|slot| slot.interval.contains(candidate)))
}
