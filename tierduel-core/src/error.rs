use thiserror::Error;

/// Errors returned by the head-to-head session.
///
/// None of these leave the session in a modified state; the caller can retry
/// with corrected input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeadToHeadError {
    #[error("need at least 2 distinct items to compare, got {found}")]
    InsufficientItems { found: usize },

    #[error("no comparison is active")]
    NoActiveComparison,

    #[error("invalid vote: {item} is not part of the current comparison")]
    InvalidVote { item: String },

    #[error("no session has been started")]
    NotStarted,

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

pub type HeadToHeadResult<T> = Result<T, HeadToHeadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HeadToHeadError::InsufficientItems { found: 1 };
        assert_eq!(err.to_string(), "need at least 2 distinct items to compare, got 1");

        let err = HeadToHeadError::InvalidVote { item: "x".to_string() };
        assert_eq!(err.to_string(), "invalid vote: x is not part of the current comparison");

        let err = HeadToHeadError::InvalidConfig("confidence_z must be positive".to_string());
        assert_eq!(err.to_string(), "invalid engine config: confidence_z must be positive");
    }
}
