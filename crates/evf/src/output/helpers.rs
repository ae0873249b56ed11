//! Common helper functions for output formatting.

use chrono::{DateTime, Local, NaiveDate};
use owo_colors::OwoColorize;

/// Truncates an ID to 8 characters for display.
pub fn truncate_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Truncates a string to a maximum length (in characters).
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats an epoch-millisecond timestamp in local time.
///
/// All-day events show only the date. Out-of-range values are shown raw.
pub fn format_time(millis: i64, all_day: bool) -> String {
    let Some(utc) = DateTime::from_timestamp_millis(millis) else {
        return millis.to_string();
    };

    let local = utc.with_timezone(&Local);
    if all_day {
        local.format("%Y-%m-%d").to_string()
    } else {
        local.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Formats an optional date bound, `-` when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// Formats event status flags for display.
pub fn format_status(cancelled: bool, has_changed: bool, use_colors: bool) -> String {
    let label = if cancelled {
        "cancelled"
    } else if has_changed {
        "changed"
    } else {
        return String::new();
    };

    if use_colors {
        if cancelled {
            label.red().to_string()
        } else {
            label.yellow().to_string()
        }
    } else {
        label.to_string()
    }
}

/// Formats a table header line, dimmed when colors are enabled.
pub fn format_header(header: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", header.dimmed())
    } else {
        format!("{header}\n")
    }
}
