//! # Resource Models
//!
//! Typed payloads and validation for the stored resources. Documents in the
//! store are plain JSON; these types shape and check what goes in.

pub mod aggregates;
pub mod bootcamp;
pub mod course;
pub mod review;

pub use bootcamp::{BootcampPayload, Career, Location};
pub use course::{CoursePayload, MinimumSkill};
pub use review::ReviewPayload;

use thiserror::Error;

/// A field-level validation failure
#[derive(Debug, Clone, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type for payload validation
pub type ModelResult<T> = Result<T, ValidationError>;

/// Check a required string field: non-empty, within the length cap
pub(crate) fn check_text(field: &str, value: &str, max_len: usize) -> ModelResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }
    Ok(())
}
