//! # availability-engine
//!
//! Deterministic free-slot computation for bookable rooms.
//!
//! Given a resource's weekly operating rules (with closures and special hours),
//! a snapshot of its bookings and a query window, the engine answers "when can
//! this room still be booked?". Everything is a pure function over its inputs:
//! no I/O, no caches, no shared state, so calls are safe to run in parallel.
//!
//! ## Quick start
//!
//! ```rust
//! use availability_engine::{compute_availability, OperatingRule, Query, ResourceCalendar};
//! use chrono::{NaiveTime, TimeZone, Utc, Weekday};
//!
//! let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
//! let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
//! let calendar = ResourceCalendar::new(
//!     "room-a",
//!     "UTC",
//!     vec![OperatingRule::weekly(&[Weekday::Wed], nine, five)],
//! );
//! let query = Query::new(
//!     "room-a",
//!     Utc.with_ymd_and_hms(2026, 3, 18, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2026, 3, 19, 0, 0, 0).unwrap(),
//! );
//!
//! let slots = compute_availability(&query, &calendar, &[]).unwrap();
//! assert_eq!(slots.len(), 1);
//! assert_eq!(slots[0].duration_minutes, 8 * 60);
//! ```
//!
//! ## Modules
//!
//! - [`interval`] — half-open UTC intervals; merge / subtract / intersect
//! - [`dst`] — wall-clock to UTC conversion and DST gap policies
//! - [`rules`] — operating rules, closures, overrides and per-day precedence
//! - [`evaluator`] — rules → concrete open intervals
//! - [`slots`] — open intervals minus padded bookings → free slots
//! - [`conflict`] — check a candidate booking
//! - [`studio`] — availability across all rooms of a studio, grouped by date
//! - [`error`] — error types

pub mod conflict;
pub mod dst;
pub mod error;
pub mod evaluator;
pub mod interval;
pub mod rules;
pub mod slots;
pub mod studio;

pub use conflict::{find_conflicts, is_bookable, Conflict};
pub use dst::DstPolicy;
pub use error::{AvailabilityError, ValidationErrors};
pub use evaluator::{open_intervals, DailyConstraints};
pub use interval::{intersect, merge, subtract, TimeInterval};
pub use rules::{EffectiveRange, OpeningHours, OperatingRule, ResourceCalendar};
pub use slots::{compute_availability, Booking, BookingStatus, FreeSlot, Query};
pub use studio::{
    group_by_local_date, studio_availability, studio_availability_by_date, DayAvailability,
    Resource, ResourceAvailability, RoomSlot, Studio, StudioRequest,
};
