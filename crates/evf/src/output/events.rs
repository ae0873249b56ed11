//! Event output formatting.

use event_filter_rs::EventRow;
use serde::Serialize;

use super::helpers::{format_header, format_status, format_time, truncate_id, truncate_str};

/// JSON output structure for the search command.
#[derive(Serialize)]
pub struct EventsListOutput<'a> {
    pub events: &'a [EventRow],
    pub total: usize,
    pub truncated: bool,
}

/// Formats events as JSON.
///
/// `total` is the number of matches before the display limit was applied.
pub fn format_events_json(events: &[EventRow], total: usize) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&EventsListOutput {
        events,
        total,
        truncated: total > events.len(),
    })
}

/// Formats events as a table.
pub fn format_events_table(events: &[EventRow], total: usize, use_colors: bool) -> String {
    if events.is_empty() {
        return "No events found.\n".to_string();
    }

    let mut output = format_header(
        &format!(
            "{:<8} {:<16} {:<16} {:<40} {}",
            "ID", "Start", "End", "Title", "Status"
        ),
        use_colors,
    );

    for event in events {
        let line = format!(
            "{:<8} {:<16} {:<16} {:<40} {}",
            truncate_id(&event.id),
            format_time(event.start_time, event.all_day),
            format_time(event.end_time, event.all_day),
            truncate_str(&event.title, 40),
            format_status(event.cancelled, event.has_changed, use_colors),
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }

    if total > events.len() {
        output.push_str(&format!(
            "\n... and {} more (use --all to show everything)\n",
            total - events.len()
        ));
    }

    output
}
