//! # Store Errors
//!
//! Error types for the document store.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Document with the given id does not exist
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Documents must be JSON objects
    #[error("Document must be a JSON object")]
    NotAnObject,

    /// Internal store failure (lock poisoning, invariant violation)
    #[error("Store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::DocumentNotFound(_) => 404,
            StoreError::NotAnObject => 400,
            StoreError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StoreError::DocumentNotFound("x".to_string()).status_code(), 404);
        assert_eq!(StoreError::NotAnObject.status_code(), 400);
        assert_eq!(StoreError::Internal("x".to_string()).status_code(), 500);
    }
}
