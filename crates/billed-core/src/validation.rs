//! # Validation Module
//!
//! Input validation for the new-bill form and its proof file.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: File selection (NewBillController::on_file_change)           │
//! │  ├── Declared content type against the allowed image types             │
//! │  └── Rejected locally: alert + input reset, no store call              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Form submit (NewBillForm::to_draft)                          │
//! │  ├── THIS MODULE: expense type, ISO date                               │
//! │  └── Numeric fields fall back instead of failing (see form.rs)         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote store                                                 │
//! │  └── Owns ids and status transitions                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::ExpenseType;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Proof File
// =============================================================================

/// Validates the declared content type of a proof file.
///
/// ## Rules
/// - Compared case-insensitively, parameters (`; charset=…`) ignored
/// - Must be one of `allowed`
/// - The file name is never consulted
///
/// ## Example
/// ```rust
/// use billed_core::validation::validate_proof_content_type;
/// use billed_core::ALLOWED_PROOF_CONTENT_TYPES;
///
/// assert!(validate_proof_content_type("image/png", &ALLOWED_PROOF_CONTENT_TYPES).is_ok());
/// assert!(validate_proof_content_type("application/pdf", &ALLOWED_PROOF_CONTENT_TYPES).is_err());
/// ```
pub fn validate_proof_content_type<S: AsRef<str>>(
    content_type: &str,
    allowed: &[S],
) -> ValidationResult<()> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if allowed
        .iter()
        .any(|a| a.as_ref().trim().eq_ignore_ascii_case(&essence))
    {
        return Ok(());
    }

    Err(ValidationError::UnsupportedFileType {
        content_type: content_type.to_string(),
    })
}

// =============================================================================
// Form Fields
// =============================================================================

/// Validates and parses an ISO `YYYY-MM-DD` date field.
///
/// ## Example
/// ```rust
/// use billed_core::validation::validate_iso_date;
///
/// assert!(validate_iso_date("datepicker", "2004-04-04").is_ok());
/// assert!(validate_iso_date("datepicker", "").is_err());
/// assert!(validate_iso_date("datepicker", "2004-13-01").is_err());
/// ```
pub fn validate_iso_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}

/// Validates the expense type field against the fixed set.
pub fn validate_expense_type(field: &str, value: &str) -> ValidationResult<ExpenseType> {
    value.parse().map_err(|_| ValidationError::NotAllowed {
        field: field.to_string(),
        allowed: ExpenseType::ALL
            .iter()
            .map(|t| t.label().to_string())
            .collect(),
    })
}

/// Validates a percentage.
pub fn validate_pct(pct: i64) -> ValidationResult<u32> {
    if !(0..=100).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "pct".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(pct as u32)
}

// =============================================================================
// Unit Tests
// =============================================================================
