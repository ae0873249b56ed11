//! The canonical query produced from a filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::directory::ManagerId;

/// Identifier of the user a filter is evaluated for.
pub type UserId = i64;

/// Result ordering requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    /// Leave results in the order the search engine ranks them.
    #[default]
    Relevance,
    /// Latest start time first.
    Newest,
    /// Earliest start time first.
    Oldest,
}

/// Canonical, order-independent representation of a filter.
///
/// Every directive of a filter is folded into one of these fields; see
/// [`reduce`](super::reduce) for the merge rules. Two filters that differ only
/// in the order of their directives (other than keywords) produce equal
/// queries.
///
/// The JSON shape (`camelCase` field names) is shared by every host that
/// builds or consumes queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Free-text words in the order they were typed.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Required title text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Required location text, matched against short and full location names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Required manager (teacher).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<ManagerId>,

    /// Events must start on or after this date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<NaiveDate>,

    /// Events must end on or before this date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<NaiveDate>,

    /// Only events of activities this user follows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribed_user_id: Option<UserId>,

    /// Result ordering.
    #[serde(default)]
    pub order_by: OrderBy,
}

impl Query {
    /// Returns a copy of this query with a different ordering.
    pub fn with_order(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    /// Returns true if the query needs a full-text index lookup.
    pub fn has_match_clauses(&self) -> bool {
        !self.keywords.is_empty()
            || self.title.is_some()
            || self.location.is_some()
            || self.manager_id.is_some()
    }

    /// Returns true if the query selects every event.
    pub fn is_unfiltered(&self) -> bool {
        !self.has_match_clauses()
            && self.after.is_none()
            && self.before.is_none()
            && self.subscribed_user_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_is_unfiltered() {
        let query = Query::default();
        assert!(query.is_unfiltered());
        assert!(!query.has_match_clauses());
        assert_eq!(query.order_by, OrderBy::Relevance);
    }

    #[test]
    fn test_range_only_query_is_filtered() {
        let query = Query {
            after: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..Query::default()
        };
        assert!(!query.is_unfiltered());
        assert!(!query.has_match_clauses());
    }

    #[test]
    fn test_with_order() {
        let query = Query::default().with_order(OrderBy::Oldest);
        assert_eq!(query.order_by, OrderBy::Oldest);
    }

    #[test]
    fn test_query_json_shape() {
        let query = Query {
            keywords: vec!["maths".to_string()],
            manager_id: Some(7),
            before: NaiveDate::from_ymd_opt(2020, 1, 1),
            subscribed_user_id: Some(42),
            order_by: OrderBy::Newest,
            ..Query::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "keywords": ["maths"],
                "managerId": 7,
                "before": "2020-01-01",
                "subscribedUserId": 42,
                "orderBy": "newest",
            })
        );

        let back: Query = serde_json::from_value(json).unwrap();
        assert_eq!(back, query);
    }
}
