//! Error types for the memory subsystem

use thiserror::Error;

/// Result alias used throughout the crate
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Errors surfaced by long-term memory operations.
///
/// Short-term memory operations never fail: a missing or expired entry is a
/// normal `None`, not an error.
#[derive(Error, Debug)]
pub enum MemoryError {
    /// The vector store or embedding capability could not be reached.
    ///
    /// The manager does not retry internally; retries are a caller policy.
    #[error("backend unavailable during '{operation}': {message}")]
    BackendUnavailable { operation: String, message: String },

    /// An embedding did not match the collection's configured dimensionality
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A vector payload could not be (de)serialized
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration supplied at construction
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl MemoryError {
    /// Create a backend-unavailable error for a named operation
    pub fn backend(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::BackendUnavailable {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimensions(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MemoryError::backend("upsert", "connection refused");
        assert_eq!(
            err.to_string(),
            "backend unavailable during 'upsert': connection refused"
        );

        let err = MemoryError::dimensions(384, 128);
        assert_eq!(
            err.to_string(),
            "embedding dimension mismatch: expected 384, got 128"
        );
    }
}
