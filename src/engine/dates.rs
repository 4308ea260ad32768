/// Small calendar helpers shared by the engine components
///
/// Everything in the engine speaks ISO-8601: weeks start on Monday and are
/// keyed by `(iso_year, iso_week)`. Adapters that store other conventions
/// (the settings table keeps a Sunday-first weekday list) translate at the
/// boundary; mixed conventions never travel through the engine.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};

/// Whether `next` is exactly one calendar day after `prev`
pub fn is_next_day(prev: NaiveDate, next: NaiveDate) -> bool {
    next - prev == Duration::days(1)
}

/// The Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// ISO week key `(iso_year, iso_week)` for a date
///
/// The ISO year can differ from the calendar year near year boundaries,
/// which is exactly why the pair is used as the bucket key.
pub fn iso_week_key(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Minutes since midnight for a wall-clock time
pub fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}
