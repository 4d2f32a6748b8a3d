use availability_engine::{
    compute_availability, Booking, OperatingRule, Query, ResourceCalendar, TimeInterval,
};
use chrono::{Duration, NaiveTime, TimeZone, Utc, Weekday};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn calendar() -> ResourceCalendar {
    let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
    ResourceCalendar::new(
        "room",
        "Europe/Berlin",
        vec![
            OperatingRule::weekly(
                &[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
                t(10),
                t(0),
            ),
            OperatingRule::weekly(&[Weekday::Sat, Weekday::Sun], t(12), t(20)),
        ],
    )
}

/// One 90-minute booking every three hours for a quarter.
fn bookings() -> Vec<Booking> {
    let origin = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    (0..90 * 8)
        .map(|i| {
            let start = origin + Duration::hours(3 * i);
            let end = start + Duration::minutes(90);
            Booking::confirmed("room", TimeInterval::new(start, end).unwrap())
        })
        .collect()
}

fn bench_quarter(c: &mut Criterion) {
    let calendar = calendar();
    let bookings = bookings();
    let query = Query::new(
        "room",
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap(),
    )
    .buffers(15, 15)
    .min_slot(60);

    c.bench_function("compute_availability/quarter", |b| {
        b.iter(|| {
            compute_availability(black_box(&query), black_box(&calendar), black_box(&bookings))
        })
    });
}

criterion_group!(benches, bench_quarter);
criterion_main!(benches);
