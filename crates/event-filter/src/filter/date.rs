//! Date literal parsing for range directives.
//!
//! Range directives (`before:`, `after:`, `during:`) take a `YYYY-M-D` literal.
//! Month and day may be written with or without leading zeros.

use chrono::{Local, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// Parses a `YYYY-M-D` date literal.
///
/// Returns `None` when the literal does not have exactly three hyphen-separated
/// segments, when any segment is empty or contains something other than ASCII
/// digits, or when the numbers do not form a real calendar date.
///
/// A `None` result is an expected outcome: the tokenizer uses it to decide that
/// the word should be searched as free text instead.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use event_filter_rs::filter::parse_date;
///
/// assert_eq!(parse_date("2020-6-5"), NaiveDate::from_ymd_opt(2020, 6, 5));
/// assert_eq!(parse_date("2020-06-05"), NaiveDate::from_ymd_opt(2020, 6, 5));
/// assert_eq!(parse_date("next-week"), None);
/// ```
pub fn parse_date(literal: &str) -> Option<NaiveDate> {
    let mut segments = literal.split('-');
    let year = parse_segment(segments.next()?)?;
    let month = parse_segment(segments.next()?)?;
    let day = parse_segment(segments.next()?)?;
    if segments.next().is_some() {
        return None;
    }

    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses one all-digit segment. Signs and whitespace are rejected.
fn parse_segment(segment: &str) -> Option<u32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Returns the epoch milliseconds of local midnight at the start of `date`.
///
/// Event times are stored as epoch milliseconds, so range bounds are bound in
/// the same unit. When local midnight does not exist (a DST gap) the first
/// valid instant of the day is used; when it is ambiguous, the earlier one.
pub fn date_bound_millis(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        LocalResult::None => {
            // Walk forward to the end of the gap; gaps are at most a few hours.
            (1..=24)
                .map(|hour| midnight + chrono::Duration::hours(hour))
                .find_map(|candidate| Local.from_local_datetime(&candidate).earliest())
                .map(|dt| dt.timestamp_millis())
                .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
        }
    }
}

/// Returns the epoch milliseconds of local midnight at the end of `date`.
///
/// This is the start of the following day, so `end_time < bound` keeps every
/// event that ends on or before `date`. The last representable date has no
/// following day and yields `i64::MAX`.
pub fn date_end_bound_millis(date: NaiveDate) -> i64 {
    date.succ_opt().map_or(i64::MAX, date_bound_millis)
}
