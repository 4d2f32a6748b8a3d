//! Expand a resource calendar into concrete open intervals.
//!
//! Days are walked in the resource's zone. Each day's plan is converted to UTC
//! endpoint by endpoint, so DST transition days come out with their real
//! absolute length.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::dst::local_to_utc;
use crate::error::AvailabilityError;
use crate::interval::{self, TimeInterval};
use crate::rules::{plan_for, OpeningHours, ResourceCalendar};

/// Caller-side narrowing applied on top of the operating rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyConstraints {
    /// Only keep sessions starting on these local weekdays.
    #[serde(default)]
    pub weekdays: Option<Vec<Weekday>>,
    /// Local time-of-day band every session is clipped to.
    #[serde(default)]
    pub daily_window: Option<OpeningHours>,
}

impl DailyConstraints {
    fn allows(&self, date: NaiveDate) -> bool {
        self.weekdays
            .as_ref()
            .is_none_or(|days| days.contains(&date.weekday()))
    }
}

/// Open intervals of `calendar` inside `window`, sorted and merged.
///
/// Days without a matching rule are closed. A session running past midnight
/// that abuts the next day's session is merged with it.
///
/// # Errors
/// Returns `AvailabilityError::UnresolvedTimezone` if the calendar's zone is unknown.
pub fn open_intervals(
    calendar: &ResourceCalendar,
    window: &TimeInterval,
) -> Result<Vec<TimeInterval>, AvailabilityError> {
    open_intervals_with(calendar, window, &DailyConstraints::default())
}

/// [`open_intervals`] narrowed by `constraints`.
pub fn open_intervals_with(
    calendar: &ResourceCalendar,
    window: &TimeInterval,
    constraints: &DailyConstraints,
) -> Result<Vec<TimeInterval>, AvailabilityError> {
    let tz = calendar.zone()?;

    // Start a day early: yesterday's late session may run into the window.
    let first_day = window.start().with_timezone(&tz).date_naive();
    let first_day = first_day.pred_opt().unwrap_or(first_day);
    let last_day = window.end().with_timezone(&tz).date_naive();

    let mut open = Vec::new();
    for date in first_day.iter_days().take_while(|d| *d <= last_day) {
        if !constraints.allows(date) {
            continue;
        }

        let plan = plan_for(&calendar.rules, date);
        tracing::trace!(%date, ?plan, "day plan");

        for hours in plan.hours() {
            let (mut local_start, mut local_end) = hours.on(date);
            if let Some(band) = &constraints.daily_window {
                let (band_start, band_end) = band.on(date);
                local_start = local_start.max(band_start);
                local_end = local_end.min(band_end);
                if local_start >= local_end {
                    continue;
                }
            }

            let (Some(start), Some(end)) = (
                local_to_utc(&tz, local_start, calendar.dst_policy),
                local_to_utc(&tz, local_end, calendar.dst_policy),
            ) else {
                continue;
            };

            if let Some(session) = TimeInterval::try_new(start, end)
                .and_then(|session| interval::intersect(&session, window))
            {
                open.push(session);
            }
        }
    }

    let merged = interval::merge(&open);
    tracing::debug!(
        resource = %calendar.resource_id,
        sessions = open.len(),
        open_intervals = merged.len(),
        "expanded operating rules"
    );
    Ok(merged)
}
