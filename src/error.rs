//! Error types for question building and persistence.

use std::io;

use thiserror::Error;

/// Why a phonetic/answer pair could not become a question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// One or both sides tokenized to zero units.
    #[error("both a phonetic prompt and an answer are required")]
    EmptyInput,

    /// The two sides tokenized to different unit counts.
    #[error("unit count mismatch: {phonetic} phonetic vs {answer} answer")]
    LengthMismatch { phonetic: usize, answer: usize },
}

/// Failure of the raw key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read key '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_carries_both_counts() {
        let err = BuildError::LengthMismatch { phonetic: 2, answer: 1 };
        assert_eq!(err.to_string(), "unit count mismatch: 2 phonetic vs 1 answer");
    }

    #[test]
    fn store_error_names_the_key() {
        let err = StoreError::Write {
            key: "scores".into(),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert!(err.to_string().contains("'scores'"));
        assert!(err.to_string().contains("disk full"));
    }
}
