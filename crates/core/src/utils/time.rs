//! Calendar-month arithmetic for the accrual sweep.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Start of the UTC calendar month containing `at`.
pub fn month_start(at: DateTime<Utc>) -> DateTime<Utc> {
    let date = at.date_naive();
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

/// Start of the UTC calendar month after the one containing `at`.
pub fn next_month_start(at: DateTime<Utc>) -> DateTime<Utc> {
    let date = at.date_naive();
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date);
    Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

/// Last second of the UTC calendar month containing `at`.
pub fn month_end(at: DateTime<Utc>) -> DateTime<Utc> {
    next_month_start(at) - Duration::seconds(1)
}

/// Start of the current UTC calendar month.
pub fn current_month_start() -> DateTime<Utc> {
    month_start(Utc::now())
}
