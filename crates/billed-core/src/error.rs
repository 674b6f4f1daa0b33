//! # Error Types
//!
//! Domain-specific error types for billed-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billed-core errors (this file)                                        │
//! │  ├── CoreError        - Formatting / parsing failures on records       │
//! │  └── ValidationError  - Form and proof-file input failures             │
//! │                                                                         │
//! │  billed-store errors (separate crate)                                  │
//! │  └── StoreError       - Remote store rejections                        │
//! │                                                                         │
//! │  billed-client errors                                                  │
//! │  └── ClientError      - What the controllers return                    │
//! │                                                                         │
//! │  Flow: ValidationError ┐                                               │
//! │        StoreError ─────┴─► ClientError → view layer                    │
//! │        CoreError ────────► raw field fallback in the bill list         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while interpreting bill data.
///
/// Display formatting returns these per field; the bill list turns them into
/// a raw fallback for that one field instead of failing the whole list.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record carried a status outside `pending | accepted | refused`.
    #[error("Unknown bill status: '{0}'")]
    UnknownStatus(String),

    /// A record carried an expense type outside the fixed set.
    #[error("Unknown expense type: '{0}'")]
    UnknownExpenseType(String),

    /// A date that is not an ISO `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// Display locale not supported.
    #[error("Unsupported locale: '{0}'")]
    UnknownLocale(String),

    /// A field needed for formatting was absent from the record.
    #[error("Missing field: {0}")]
    MissingField(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when what the user typed or picked does not meet the
/// form's requirements. They never leave the controller as store traffic.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., a date that is not ISO).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Proof file is not one of the accepted image types.
    #[error("Unsupported proof file type: '{content_type}'")]
    UnsupportedFileType { content_type: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
