//! # Client Error Type
//!
//! What the controllers return to the view layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Billed                                 │
//! │                                                                         │
//! │  View event                  Controller                                 │
//! │  ──────────                  ──────────                                 │
//! │                                                                         │
//! │  file picked ──────────► on_file_change()                               │
//! │                           └─ wrong type ─► alert + reset ─► Validation  │
//! │                                                                         │
//! │  form submitted ───────► submit()                                       │
//! │                           ├─ no file ──────────────────► NoFileSelected │
//! │                           ├─ already submitting ─────► SubmitInProgress │
//! │                           ├─ bad date / type ──────────────► Validation │
//! │                           └─ store rejects ─► ErrorReporter (not Err)   │
//! │                                                                         │
//! │  list shown ───────────► fetch_bills()                                  │
//! │                           └─ list call rejects ──────────────► Store    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billed_core::ValidationError;
use billed_store::StoreError;
use thiserror::Error;

/// Client error covering every failure a controller hands back.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A store call failed and the caller is the one to handle it.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Form or proof-file input rejected locally.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The session blob is missing or unreadable.
    #[error("Session error: {0}")]
    Session(String),

    /// A submission of this form has not settled yet.
    #[error("A submission is already in progress")]
    SubmitInProgress,

    /// Submit was triggered without a valid proof file.
    #[error("No valid proof file selected")]
    NoFileSelected,

    /// A path that matches none of the known routes.
    #[error("Unknown route: '{0}'")]
    UnknownRoute(String),

    /// Configuration could not be loaded, saved or validated.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

/// Result type alias for controller operations.
pub type ClientResult<T> = Result<T, ClientError>;
