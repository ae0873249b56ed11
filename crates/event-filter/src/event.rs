//! Event rows returned by a compiled statement.

use serde::{Deserialize, Serialize};

/// One row of the `Events` table, in
/// [`EVENT_COLUMNS`](crate::filter::EVENT_COLUMNS) order.
///
/// Times are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub activity_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    pub manager_id: i64,
    pub all_day: bool,
    pub cancelled: bool,
    pub start_time: i64,
    pub end_time: i64,
    pub has_changed: bool,
    pub hash: String,
}
