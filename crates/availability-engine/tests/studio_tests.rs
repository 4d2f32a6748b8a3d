//! Tests for studio-wide availability and per-date grouping.

use availability_engine::{
    studio_availability, studio_availability_by_date, AvailabilityError, Booking, OperatingRule,
    Resource, ResourceCalendar, RoomSlot, Studio, StudioRequest, TimeInterval,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

// ── Helpers ─────────────────────────────────────────────────────────────────

const ALL_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn t(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn utc(d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
}

fn room(id: &str, name: &str, size: u32, opens: u32, closes: u32) -> Resource {
    Resource {
        name: name.to_string(),
        size,
        calendar: ResourceCalendar::new(
            id,
            "UTC",
            vec![OperatingRule::weekly(&ALL_WEEK, t(opens), t(closes))],
        ),
    }
}

fn studio() -> Studio {
    Studio {
        name: "hf-14".to_string(),
        timezone: "UTC".to_string(),
        resources: vec![
            room("r3", "Studio C", 60, 18, 0),
            room("r1", "Studio A", 40, 10, 22),
            room("r2", "Studio B", 80, 19, 23),
        ],
    }
}

/// Two days, 2026-03-18 and 2026-03-19.
fn request() -> StudioRequest {
    StudioRequest::new(utc(18, 0), utc(20, 0))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn rooms_sorted_by_name_with_their_slots() {
    let results = studio_availability(&studio(), &request(), &[]).unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Studio A", "Studio B", "Studio C"]);
    assert_eq!(results[0].slots.len(), 2);
    assert_eq!(results[0].slots[0].duration_minutes, 12 * 60);
}

#[test]
fn small_rooms_are_left_out() {
    let mut request = request();
    request.min_size = 50;

    let results = studio_availability(&studio(), &request, &[]).unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.resource_id.as_str()).collect();
    assert_eq!(ids, vec!["r2", "r3"]);
}

#[test]
fn bookings_only_affect_their_own_room() {
    let bookings = vec![Booking::confirmed(
        "r2",
        TimeInterval::new(utc(18, 19), utc(18, 23)).unwrap(),
    )];

    let results = studio_availability(&studio(), &request(), &bookings).unwrap();

    let b = results.iter().find(|r| r.resource_id == "r2").unwrap();
    assert_eq!(b.slots.len(), 1, "first evening fully booked");
    let c = results.iter().find(|r| r.resource_id == "r3").unwrap();
    assert_eq!(c.slots.len(), 2);
}

#[test]
fn grouped_by_date_and_ordered_by_start() {
    let mut request = request();
    request.min_slot_minutes = 60;

    let days = studio_availability_by_date(&studio(), &request, &[]).unwrap();

    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 3, 18).unwrap());
    let order: Vec<&str> = days[0].slots.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(order, vec!["Studio A", "Studio C", "Studio B"]);
    let second: &RoomSlot = &days[0].slots[1];
    assert_eq!(second.slot.interval.end(), utc(19, 0));
}

#[test]
fn session_crossing_midnight_is_listed_on_its_start_date() {
    // Studio C runs 18:00-00:00, ending on the 19th but starting on the 18th.
    let mut request = request();
    request.min_size = 60;
    request.window_end = utc(19, 12);

    let days = studio_availability_by_date(&studio(), &request, &[]).unwrap();

    assert_eq!(days.len(), 1);
    assert_eq!(days[0].slots.len(), 2, "Studio B and Studio C on the 18th");
}

#[test]
fn invalid_room_and_request_reported_together() {
    let mut studio = studio();
    studio.resources[1].calendar.timezone = "Not/AZone".to_string();
    let mut request = request();
    request.buffer_after_minutes = -5;

    let err = studio_availability(&studio, &request, &[]).unwrap_err();

    assert_eq!(err.errors().len(), 2, "unexpected: {err}");
    assert!(err
        .errors()
        .contains(&AvailabilityError::UnresolvedTimezone("Not/AZone".to_string())));
}

#[test]
fn studio_deserializes_from_json() {
    let json = r#"{
        "name": "hf-14",
        "timezone": "Europe/Berlin",
        "resources": [{
            "name": "Studio A",
            "size": 45,
            "calendar": {
                "resource_id": "r1",
                "timezone": "Europe/Berlin",
                "rules": [{"weekdays": ["Mon", "Tue"], "opens": "19:00:00", "closes": "00:00:00"}]
            }
        }]
    }"#;

    let studio: Studio = serde_json::from_str(json).unwrap();

    assert_eq!(studio.resources[0].id(), "r1");
    assert_eq!(studio.resources[0].calendar.rules[0].weekdays.len(), 2);
}
