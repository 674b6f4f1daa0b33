//! # billed-core: Pure Domain Logic for Billed
//!
//! This crate holds everything about expense bills that can be decided
//! without touching the outside world: the `Bill` record, its status and
//! expense category, the new-bill form rules, proof-file validation, and the
//! display formatting used by the bill list.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Billed Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    View layer (templates)                       │   │
//! │  │       Bills list ──► eye icon preview      New bill form        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ view events                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    billed-client (controllers)                  │   │
//! │  │      BillListController              NewBillController          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billed-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   form    │  │  format   │  │ validation│  │   │
//! │  │   │   Bill    │  │ NewBill-  │  │ dates     │  │ file type │  │   │
//! │  │   │  Status   │  │   Form    │  │ statuses  │  │ ISO dates │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE • NO NAVIGATION • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 billed-store (remote store boundary)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Bill, BillStatus, ExpenseType, CurrentUser)
//! - [`form`] - New-bill form fields and draft construction
//! - [`format`] - Display formatting and anti-chronological ordering
//! - [`validation`] - Proof file and field validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use billed_core::format::{format_date, Locale};
//!
//! assert_eq!(format_date("2004-04-04", Locale::Fr).unwrap(), "4 Avr. 04");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod form;
pub mod format;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use form::{NewBillForm, SelectedFile};
pub use format::{BillListItem, FieldDisplay, Locale};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// VAT percentage used when the form's `pct` field is missing or unusable.
pub const DEFAULT_PCT: u32 = 20;

/// Content types accepted for the proof file of a bill.
///
/// Checked against the declared content type of the selected file, never
/// against its file name extension.
pub const ALLOWED_PROOF_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Alert shown when the selected proof file is not an accepted image.
pub const INVALID_FILE_TYPE_MESSAGE: &str =
    "Invalid file type. Please upload an image file (jpg, jpeg, or png).";
