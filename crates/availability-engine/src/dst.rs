//! Wall-clock to UTC conversion with DST transition policies.
//!
//! Offsets are looked up per instant through `chrono-tz`, never cached, so a
//! session on a transition day gets its true absolute length.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::AvailabilityError;

/// Longest clock jump we search across. Covers whole skipped days such as
/// Pacific/Apia on 2011-12-30.
const MAX_GAP_MINUTES: i64 = 25 * 60;

/// Policy for session boundaries that fall in a DST gap (e.g. 02:30 during
/// spring forward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Move the boundary to the first valid instant after the gap.
    #[default]
    ShiftForward,
    /// Drop the whole session for that day.
    Skip,
}

/// Resolve an IANA zone name.
pub fn parse_timezone(name: &str) -> Result<Tz, AvailabilityError> {
    name.parse::<Tz>()
        .map_err(|_| AvailabilityError::UnresolvedTimezone(name.to_string()))
}

/// Convert a local wall-clock time in `tz` to UTC.
///
/// - Unambiguous times map directly.
/// - Ambiguous times (fall-back fold) map to the earliest instant.
/// - Nonexistent times (spring-forward gap) follow `policy`; `Skip` yields `None`.
pub fn local_to_utc(tz: &Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => {
                tracing::debug!(%local, zone = tz.name(), "local time falls in DST gap, skipping");
                None
            }
            DstPolicy::ShiftForward => {
                let shifted = first_instant_after_gap(tz, local);
                tracing::debug!(
                    %local,
                    zone = tz.name(),
                    ?shifted,
                    "local time falls in DST gap, shifting forward"
                );
                shifted
            }
        },
    }
}

/// Walk forward minute by minute until the wall clock exists again.
fn first_instant_after_gap(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    (1..=MAX_GAP_MINUTES).find_map(|minutes| {
        tz.from_local_datetime(&(local + Duration::minutes(minutes)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn unknown_zone_is_reported() {
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert_eq!(
            err,
            AvailabilityError::UnresolvedTimezone("Mars/Olympus_Mons".to_string())
        );
    }

    #[test]
    fn gap_shifts_to_transition_instant() {
        // 2026-03-08 02:30 does not exist in America/New_York; clocks jump
        // from 02:00 EST to 03:00 EDT, i.e. 07:00 UTC.
        let tz = parse_timezone("America/New_York").unwrap();
        let utc = local_to_utc(&tz, local(2026, 3, 8, 2, 30), DstPolicy::ShiftForward).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap());
    }

    #[test]
    fn gap_with_skip_policy_is_none() {
        let tz = parse_timezone("America/New_York").unwrap();
        assert_eq!(local_to_utc(&tz, local(2026, 3, 8, 2, 30), DstPolicy::Skip), None);
    }

    #[test]
    fn fold_resolves_to_earliest() {
        // 2026-11-01 01:30 happens twice in America/New_York; first as EDT (05:30 UTC).
        let tz = parse_timezone("America/New_York").unwrap();
        let utc = local_to_utc(&tz, local(2026, 11, 1, 1, 30), DstPolicy::ShiftForward).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap());
    }
}
