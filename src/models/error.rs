//! Domain errors
//!
//! Raised eagerly by constructors and setters, before any field is touched.

use thiserror::Error;

/// Errors produced by entity construction, assignment and metric calculation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// An argument is outside its documented range or domain
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A required referenced entity is absent
    #[error("Missing required reference: {0}")]
    MissingReference(&'static str),

    /// The operation is undefined for the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A uniqueness constraint would be violated
    #[error("Duplicate {key}: {value}")]
    DuplicateKey { key: &'static str, value: String },
}

impl ModelError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ModelError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ModelError::Validation { .. })
    }
}

/// Result type for domain operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Fail unless `value` is strictly positive
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> ModelResult<()> {
    // NaN fails this comparison too
    if value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::validation(field, format!("must be greater than 0, got {}", value)))
    }
}
