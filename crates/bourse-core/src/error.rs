use bourse_warehouse::WarehouseError;
use thiserror::Error;

/// Validation errors for caller-supplied input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("instrument code cannot be empty")]
    EmptyCode,
    #[error("instrument code length {len} exceeds max {max}")]
    CodeTooLong { len: usize, max: usize },
    #[error("instrument code contains invalid character '{ch}' at index {index}")]
    CodeInvalidChar { ch: char, index: usize },

    #[error("session date must be YYYY-MM-DD: '{value}'")]
    InvalidSessionDate { value: String },
    #[error("range start {start} is after range end {end}")]
    InvertedRange { start: String, end: String },

    #[error("'{field}' must be a positive integer")]
    NonPositiveWindow { field: &'static str },

    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] WarehouseError),

    #[error("stored row for '{code}' is malformed: {reason}")]
    InvalidStoredRow { code: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
