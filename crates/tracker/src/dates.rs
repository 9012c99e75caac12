use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

use crate::error::{Result, TrackerError};

/// Current calendar date in US Eastern time.
///
/// Every "is this today" comparison in the product goes through one fixed
/// zone, so players in different timezones agree on which day a score
/// belongs to. Stored dates are assumed normalized to the same convention
/// at write time; no conversion of stored values happens here.
pub fn today() -> NaiveDate {
    eastern_date(Utc::now())
}

/// Whether a stored date equals `today()`. Exact equality, no conversion.
pub fn is_today(day: NaiveDate) -> bool {
    day == today()
}

/// Converts a UTC instant to its US Eastern calendar date.
pub fn eastern_date(instant: DateTime<Utc>) -> NaiveDate {
    let offset = if in_daylight_time(instant) {
        Duration::hours(-4)
    } else {
        Duration::hours(-5)
    };
    (instant + offset).date_naive()
}

/// Strict `YYYY-MM-DD` parse for values arriving from the backend.
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| TrackerError::InvalidDate(raw.to_string()))
}

/// US daylight saving window: from 2:00 EST on the second Sunday of March
/// (07:00 UTC) until 2:00 EDT on the first Sunday of November (06:00 UTC).
fn in_daylight_time(instant: DateTime<Utc>) -> bool {
    let year = instant.year();
    let start = nth_sunday(year, 3, 2).and_hms_opt(7, 0, 0).unwrap().and_utc();
    let end = nth_sunday(year, 11, 1).and_hms_opt(6, 0, 0).unwrap().and_utc();
    instant >= start && instant < end
}

fn nth_sunday(year: i32, month: u32, n: u8) -> NaiveDate {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sun, n).unwrap()
}
