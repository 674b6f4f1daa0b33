//! # Store Error Types
//!
//! Error types for calls across the remote store boundary.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Remote store rejects a call ("404", "500", network down)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module)                                              │
//! │       │                                                                 │
//! │       ├── list()   ─► returned to the view layer as ClientError::Store │
//! │       │                                                                 │
//! │       └── create() / update() during submit                            │
//! │              ─► handed to the ErrorReporter, form stays on screen      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Store call failures.
///
/// `Clone` so a fault can be queued on the in-memory store and so reporters
/// can keep what they were given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store answered and refused the call.
    ///
    /// The message is kept verbatim; a rejection with `"404"` displays as
    /// exactly `404`.
    #[error("{0}")]
    Rejected(String),

    /// The addressed record or file does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with something that is not the expected shape.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl StoreError {
    /// Shorthand for a rejection carrying `message`.
    pub fn rejected(message: impl Into<String>) -> Self {
        StoreError::Rejected(message.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidPayload(err.to_string())
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
