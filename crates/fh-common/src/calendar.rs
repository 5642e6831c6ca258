//! Timestamp parsing and calendar naming.
//!
//! Source tables store schedule times as text. Anything that does not match a
//! known layout parses to `None`; callers turn that into a missing cell rather
//! than failing the run.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use polars::prelude::{AnyValue, TimeUnit};

use crate::values::any_to_string_opt;

/// English month names in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a timestamp cell.
///
/// Date-only values are read as midnight; RFC 3339 values with an offset are
/// converted to UTC.
///
/// ```
/// use fh_common::parse_timestamp;
///
/// assert!(parse_timestamp("2021-03-04 10:15:00").is_some());
/// assert!(parse_timestamp("2021-03-04").is_some());
/// assert!(parse_timestamp("not a date").is_none());
/// ```
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }
    parse_date(trimmed).map(|date| date.and_time(NaiveTime::MIN))
}

/// Parses a date cell, accepting a trailing time component.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    // "2021-03-04 10:15:00" style values still carry a usable date
    let head = trimmed.split([' ', 'T']).next()?;
    if head.len() == trimmed.len() {
        return None;
    }
    parse_date(head)
}

/// Converts epoch milliseconds back to a naive UTC timestamp.
pub fn timestamp_from_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Reads a timestamp back out of a cell of any temporal or text dtype.
///
/// Polars `Datetime` and `Date` cells are converted directly; text cells go
/// through [`parse_timestamp`].
pub fn any_to_timestamp(value: AnyValue<'_>) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Null => None,
        AnyValue::Datetime(v, unit, _) => datetime_from_unit(v, unit),
        AnyValue::DatetimeOwned(v, unit, _) => datetime_from_unit(v, unit),
        AnyValue::Date(days) => NaiveDate::from_ymd_opt(1970, 1, 1)?
            .checked_add_signed(TimeDelta::try_days(i64::from(days))?)
            .map(|date| date.and_time(NaiveTime::MIN)),
        other => any_to_string_opt(other).and_then(|text| parse_timestamp(&text)),
    }
}

fn datetime_from_unit(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let millis = match unit {
        TimeUnit::Milliseconds => value,
        TimeUnit::Microseconds => value.div_euclid(1_000),
        TimeUnit::Nanoseconds => value.div_euclid(1_000_000),
    };
    timestamp_from_millis(millis)
}

/// Returns the English name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(idx).copied()
}

/// Returns the 1-based month number for an English month name.
pub fn month_index(name: &str) -> Option<u32> {
    let trimmed = name.trim();
    MONTH_NAMES
        .iter()
        .position(|month| month.eq_ignore_ascii_case(trimmed))
        .and_then(|idx| u32::try_from(idx + 1).ok())
}
