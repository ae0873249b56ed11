//! Manager (teacher) directory lookup.
//!
//! The tokenizer resolves `teacher:CODE` directives through a
//! [`ManagerDirectory`]. The directory is supplied by the caller, so the
//! compiler never owns a process-wide list of managers or decides when that
//! list is refreshed.

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

/// Numeric identifier of a manager (teacher).
pub type ManagerId = i64;

/// Maximum Levenshtein distance to consider a display code as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Outcome of resolving a display code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The code belongs to this manager.
    Found(ManagerId),
    /// No manager has this display code.
    NotFound,
}

impl Lookup {
    /// Returns the resolved id, if any.
    pub fn id(self) -> Option<ManagerId> {
        match self {
            Lookup::Found(id) => Some(id),
            Lookup::NotFound => None,
        }
    }
}

/// Point-in-time lookup of managers by their display code.
///
/// Implementations may be backed by anything (a database table, a cached API
/// response, a fixed list). Lookups are exact and case-sensitive.
pub trait ManagerDirectory {
    /// Resolves a display code to a manager id.
    fn resolve(&self, code: &str) -> Lookup;

    /// Returns every known display code. Used only for "did you mean" hints.
    fn codes(&self) -> Vec<&str>;
}

/// A manager entry as stored in configuration or fetched from the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    /// Manager id as used by the event store.
    pub id: ManagerId,
    /// Short code users type after `teacher:`, e.g. `JS`.
    pub display_code: String,
    /// Full display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// In-memory [`ManagerDirectory`] over a list of managers.
///
/// When two managers share a display code, the first one wins.
#[derive(Debug, Clone, Default)]
pub struct ManagerList {
    managers: Vec<Manager>,
}

impl ManagerList {
    /// Creates a directory from a list of managers.
    pub fn new(managers: Vec<Manager>) -> Self {
        Self { managers }
    }

    /// Returns the managers in this directory.
    pub fn managers(&self) -> &[Manager] {
        &self.managers
    }
}

impl FromIterator<Manager> for ManagerList {
    fn from_iter<I: IntoIterator<Item = Manager>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ManagerDirectory for ManagerList {
    fn resolve(&self, code: &str) -> Lookup {
        self.managers
            .iter()
            .find(|m| m.display_code == code)
            .map_or(Lookup::NotFound, |m| Lookup::Found(m.id))
    }

    fn codes(&self) -> Vec<&str> {
        self.managers
            .iter()
            .map(|m| m.display_code.as_str())
            .collect()
    }
}

impl<D: ManagerDirectory + ?Sized> ManagerDirectory for &D {
    fn resolve(&self, code: &str) -> Lookup {
        (**self).resolve(code)
    }

    fn codes(&self) -> Vec<&str> {
        (**self).codes()
    }
}

/// Finds the closest display code to `code` for a "did you mean" hint.
///
/// Comparison is case-insensitive. Returns `None` for exact matches and when
/// nothing is within the suggestion distance.
pub fn find_similar_code<'a>(
    code: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let code_lower = code.to_lowercase();

    let (best_match, best_distance) = candidates
        .into_iter()
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| {
            let distance = levenshtein(&code_lower, &candidate.to_lowercase());
            (candidate, distance)
        })
        .min_by_key(|(_, d)| *d)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else if best_distance == 0 && best_match != code {
        // Same letters, different case: lookups are case-sensitive.
        Some(best_match.to_string())
    } else {
        None
    }
}
