//! Availability across every room of a studio.
//!
//! Runs the slot resolver for each resource large enough for the request and
//! regroups the results per local calendar date, which is how a rehearsal
//! studio's free rooms are usually presented ("Tuesday: room A 19:00-21:00,
//! room C 20:00-00:00").

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::parse_timezone;
use crate::error::{Result, ValidationErrors};
use crate::evaluator::DailyConstraints;
use crate::rules::ResourceCalendar;
use crate::slots::{compute_availability, Booking, FreeSlot, Query};

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    /// Capacity used for the `min_size` filter (e.g. square metres).
    #[serde(default)]
    pub size: u32,
    pub calendar: ResourceCalendar,
}

impl Resource {
    pub fn id(&self) -> &str {
        &self.calendar.resource_id
    }
}

/// A studio: a named group of rooms presented in one time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Studio {
    pub name: String,
    /// Zone used to group slots by calendar date.
    pub timezone: String,
    pub resources: Vec<Resource>,
}

/// An availability request applied to every qualifying room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioRequest {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    #[serde(default)]
    pub min_slot_minutes: i64,
    #[serde(default)]
    pub buffer_before_minutes: i64,
    #[serde(default)]
    pub buffer_after_minutes: i64,
    /// Rooms smaller than this are left out.
    #[serde(default)]
    pub min_size: u32,
    #[serde(flatten)]
    pub constraints: DailyConstraints,
}

impl StudioRequest {
    pub fn new(window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Self {
        Self {
            window_start,
            window_end,
            min_slot_minutes: 0,
            buffer_before_minutes: 0,
            buffer_after_minutes: 0,
            min_size: 0,
            constraints: DailyConstraints::default(),
        }
    }

    /// The single-resource query this request implies for `resource_id`.
    pub fn query_for(&self, resource_id: &str) -> Query {
        Query {
            resource_id: resource_id.to_string(),
            window_start: self.window_start,
            window_end: self.window_end,
            min_slot_minutes: self.min_slot_minutes,
            buffer_before_minutes: self.buffer_before_minutes,
            buffer_after_minutes: self.buffer_after_minutes,
            constraints: self.constraints.clone(),
        }
    }
}

/// Free slots of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAvailability {
    pub resource_id: String,
    pub name: String,
    pub size: u32,
    pub slots: Vec<FreeSlot>,
}

/// One free slot in the per-date view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSlot {
    pub resource_id: String,
    pub name: String,
    #[serde(flatten)]
    pub slot: FreeSlot,
}

/// Every free slot starting on one local date, ordered by start then room name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub slots: Vec<RoomSlot>,
}

/// Compute free slots for every room with `size >= request.min_size`.
///
/// Rooms are returned sorted by name. Validation covers the request once and
/// every qualifying room's calendar; all problems are reported together.
pub fn studio_availability(
    studio: &Studio,
    request: &StudioRequest,
    bookings: &[Booking],
) -> Result<Vec<ResourceAvailability>> {
    let mut rooms: Vec<&Resource> = studio
        .resources
        .iter()
        .filter(|r| r.size >= request.min_size)
        .collect();
    rooms.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id().cmp(b.id())));

    let mut errors = request.query_for(&studio.name).validate();
    if let Err(e) = parse_timezone(&studio.timezone) {
        errors.push(e);
    }
    for room in &rooms {
        errors.extend(room.calendar.validate());
    }
    if let Some(report) = ValidationErrors::from_errors(errors) {
        return Err(report);
    }

    let mut results = Vec::with_capacity(rooms.len());
    for room in rooms {
        let query = request.query_for(room.id());
        let slots = compute_availability(&query, &room.calendar, bookings)?;
        results.push(ResourceAvailability {
            resource_id: room.id().to_string(),
            name: room.name.clone(),
            size: room.size,
            slots,
        });
    }

    tracing::debug!(
        studio = %studio.name,
        rooms = results.len(),
        skipped = studio.resources.len() - results.len(),
        "computed studio availability"
    );
    Ok(results)
}

/// Bucket slots by the local date (in `tz`) on which they start.
///
/// Dates with no slots are absent. Output is ordered by date.
pub fn group_by_local_date(results: &[ResourceAvailability], tz: &Tz) -> Vec<DayAvailability> {
    let mut days: BTreeMap<NaiveDate, Vec<RoomSlot>> = BTreeMap::new();

    for room in results {
        for slot in &room.slots {
            let date = slot.interval.start().with_timezone(tz).date_naive();
            days.entry(date).or_default().push(RoomSlot {
                resource_id: room.resource_id.clone(),
                name: room.name.clone(),
                slot: *slot,
            });
        }
    }

    days.into_iter()
        .map(|(date, mut slots)| {
            slots.sort_by(|a, b| {
                a.slot
                    .interval
                    .cmp(&b.slot.interval)
                    .then_with(|| a.name.cmp(&b.name))
            });
            DayAvailability { date, slots }
        })
        .collect()
}

/// [`studio_availability`] grouped per local date in the studio's zone.
pub fn studio_availability_by_date(
    studio: &Studio,
    request: &StudioRequest,
    bookings: &[Booking],
) -> Result<Vec<DayAvailability>> {
    let results = studio_availability(studio, request, bookings)?;
    let tz = parse_timezone(&studio.timezone)?;
    Ok(group_by_local_date(&results, &tz))
}
