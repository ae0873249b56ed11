//! Error types for the filter compiler.

use thiserror::Error;

/// A specialized Result type for filter compilation.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while turning a filter string into a query.
///
/// Almost every malformed input degrades to a keyword instead of failing;
/// the only error path is a strict directory policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A `teacher:` directive named a code the directory does not know, and
    /// the tokenizer was configured to reject unresolved codes.
    #[error("unknown teacher code '{code}'{}", suggestion_hint(.suggestion))]
    UnknownTeacher {
        /// The unresolved display code.
        code: String,
        /// The closest known code, if one is similar enough.
        suggestion: Option<String>,
    },
}

impl FilterError {
    /// Creates an unknown teacher error.
    pub fn unknown_teacher(code: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::UnknownTeacher {
            code: code.into(),
            suggestion,
        }
    }
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{s}'?"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_teacher_message() {
        let err = FilterError::unknown_teacher("ZZ", None);
        assert_eq!(err.to_string(), "unknown teacher code 'ZZ'");
    }

    #[test]
    fn test_unknown_teacher_message_with_suggestion() {
        let err = FilterError::unknown_teacher("J5", Some("JS".to_string()));
        assert_eq!(
            err.to_string(),
            "unknown teacher code 'J5'. Did you mean 'JS'?"
        );
    }
}
