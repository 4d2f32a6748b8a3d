//! Resolve bookable free slots for one resource.
//!
//! Open intervals come from the rule evaluator; active bookings are padded by
//! the query's buffers, clipped to the window and merged into one busy set,
//! which is then subtracted from every open interval. Gaps shorter than the
//! minimum slot duration are dropped.

use chrono::{DateTime, Duration, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result, ValidationErrors};
use crate::evaluator::{open_intervals_with, DailyConstraints};
use crate::interval::{self, TimeInterval};
use crate::rules::{OpeningHours, ResourceCalendar};

/// Lifecycle state of a booking. Only cancelled bookings free their time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl BookingStatus {
    pub fn occupies_time(self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

/// An existing reservation, as read from the booking store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub resource_id: String,
    #[serde(flatten)]
    pub interval: TimeInterval,
    pub status: BookingStatus,
}

impl Booking {
    pub fn new(
        resource_id: impl Into<String>,
        interval: TimeInterval,
        status: BookingStatus,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            interval,
            status,
        }
    }

    pub fn confirmed(resource_id: impl Into<String>, interval: TimeInterval) -> Self {
        Self::new(resource_id, interval, BookingStatus::Confirmed)
    }
}

/// An availability request for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub resource_id: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    /// Gaps shorter than this are not reported.
    #[serde(default)]
    pub min_slot_minutes: i64,
    /// Idle time required before every booking.
    #[serde(default)]
    pub buffer_before_minutes: i64,
    /// Idle time required after every booking.
    #[serde(default)]
    pub buffer_after_minutes: i64,
    #[serde(flatten)]
    pub constraints: DailyConstraints,
}

impl Query {
    pub fn new(
        resource_id: impl Into<String>,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            window_start,
            window_end,
            min_slot_minutes: 0,
            buffer_before_minutes: 0,
            buffer_after_minutes: 0,
            constraints: DailyConstraints::default(),
        }
    }

    pub fn min_slot(mut self, minutes: i64) -> Self {
        self.min_slot_minutes = minutes;
        self
    }

    pub fn buffers(mut self, before_minutes: i64, after_minutes: i64) -> Self {
        self.buffer_before_minutes = before_minutes;
        self.buffer_after_minutes = after_minutes;
        self
    }

    pub fn on_weekdays(mut self, weekdays: &[Weekday]) -> Self {
        self.constraints.weekdays = Some(weekdays.to_vec());
        self
    }

    pub fn within_daily_window(mut self, hours: OpeningHours) -> Self {
        self.constraints.daily_window = Some(hours);
        self
    }

    /// The query window as an interval.
    pub fn window(&self) -> std::result::Result<TimeInterval, AvailabilityError> {
        TimeInterval::try_new(self.window_start, self.window_end).ok_or(
            AvailabilityError::InvalidWindow {
                start: self.window_start,
                end: self.window_end,
            },
        )
    }

    pub fn buffer_before(&self) -> Duration {
        saturating_minutes(self.buffer_before_minutes)
    }

    pub fn buffer_after(&self) -> Duration {
        saturating_minutes(self.buffer_after_minutes)
    }

    pub fn min_slot_duration(&self) -> Duration {
        saturating_minutes(self.min_slot_minutes)
    }

    /// Check the window, durations and daily band, reporting every problem found.
    pub fn validate(&self) -> Vec<AvailabilityError> {
        let mut errors = Vec::new();

        if let Err(e) = self.window() {
            errors.push(e);
        }
        for (field, minutes) in [
            ("min_slot_minutes", self.min_slot_minutes),
            ("buffer_before_minutes", self.buffer_before_minutes),
            ("buffer_after_minutes", self.buffer_after_minutes),
        ] {
            if minutes < 0 {
                errors.push(AvailabilityError::NegativeDuration { field, minutes });
            } else if Duration::try_minutes(minutes).is_none() {
                errors.push(AvailabilityError::DurationOutOfRange { field, minutes });
            }
        }
        if let Some(band) = &self.constraints.daily_window {
            if let Err(reason) = band.check() {
                errors.push(AvailabilityError::InvalidInterval(format!(
                    "daily window: {}",
                    reason
                )));
            }
        }

        errors
    }
}

/// `minutes` as a `Duration`, clamped to the representable range.
fn saturating_minutes(minutes: i64) -> Duration {
    Duration::try_minutes(minutes).unwrap_or(if minutes < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    })
}

/// A bookable gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    #[serde(flatten)]
    pub interval: TimeInterval,
    pub duration_minutes: i64,
}

impl From<TimeInterval> for FreeSlot {
    fn from(interval: TimeInterval) -> Self {
        Self {
            interval,
            duration_minutes: interval.duration_minutes(),
        }
    }
}

/// Validate a query against a calendar, collecting every error.
pub fn validate_request(query: &Query, calendar: &ResourceCalendar) -> Result<TimeInterval> {
    let mut errors = query.validate();
    errors.extend(calendar.validate());
    match ValidationErrors::from_errors(errors) {
        Some(report) => Err(report),
        None => query.window().map_err(ValidationErrors::from),
    }
}

/// Active bookings of `resource_id`, padded by the buffers, clipped to
/// `window` and merged.
///
/// Padding happens before clipping, so a booking just outside the window
/// still blocks the edge of the window through its buffer.
pub fn busy_intervals(
    bookings: &[Booking],
    resource_id: &str,
    window: &TimeInterval,
    buffer_before: Duration,
    buffer_after: Duration,
) -> Vec<TimeInterval> {
    let padded: Vec<TimeInterval> = bookings
        .iter()
        .filter(|b| b.status.occupies_time() && b.resource_id == resource_id)
        .filter_map(|b| {
            interval::intersect(&b.interval.padded(buffer_before, buffer_after), window)
        })
        .collect();

    interval::merge(&padded)
}

/// Compute the free slots of one resource for `query`.
///
/// Returns `Ok(vec![])` when nothing is free; invalid input is reported as
/// [`ValidationErrors`] listing every problem.
///
/// # Errors
/// - `InvalidWindow` if `window_start >= window_end`
/// - `InvalidRule` for each malformed rule
/// - `UnresolvedTimezone` if the calendar's zone is unknown
/// - `NegativeDuration` for each negative minute field
/// - `DurationOutOfRange` for each minute field too large for a `Duration`
pub fn compute_availability(
    query: &Query,
    calendar: &ResourceCalendar,
    bookings: &[Booking],
) -> Result<Vec<FreeSlot>> {
    let window = validate_request(query, calendar)?;
    let open = open_intervals_with(calendar, &window, &query.constraints)?;
    let busy = busy_intervals(
        bookings,
        &query.resource_id,
        &window,
        query.buffer_before(),
        query.buffer_after(),
    );
    let min_slot = query.min_slot_duration();

    let mut slots = Vec::new();
    for session in &open {
        let overlapping: Vec<TimeInterval> = busy
            .iter()
            .filter_map(|b| interval::intersect(b, session))
            .collect();
        slots.extend(
            interval::subtract(session, &overlapping)
                .into_iter()
                .filter(|gap| gap.duration() >= min_slot)
                .map(FreeSlot::from),
        );
    }

    tracing::debug!(
        resource = %query.resource_id,
        open_intervals = open.len(),
        busy_intervals = busy.len(),
        free_slots = slots.len(),
        "resolved free slots"
    );
    Ok(slots)
}
