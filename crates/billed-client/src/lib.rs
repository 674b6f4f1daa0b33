//! # billed-client: Employee Screens of Billed
//!
//! Controllers for the bill list and the new-bill form, plus what they are
//! wired to: the session, the router, the view surface and the error
//! reporter.
//!
//! ## Module Organization
//! ```text
//! billed_client/
//! ├── lib.rs          ◄─── You are here (exports, logging setup)
//! ├── controllers/
//! │   ├── bills.rs    ◄─── BillListController
//! │   └── new_bill.rs ◄─── NewBillController
//! ├── config.rs       ◄─── ClientConfig (billed.toml + env)
//! ├── navigation.rs   ◄─── Route, Navigator, highlight icons
//! ├── session.rs      ◄─── SessionStore, SessionContext
//! ├── view.rs         ◄─── EventRegistry, view capabilities
//! ├── reporter.rs     ◄─── ErrorReporter, TracingReporter
//! └── error.rs        ◄─── ClientError
//! ```
//!
//! ## Collaborators
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionStore ──load──► SessionContext ──┬──► BillListController        │
//! │                                          └──► NewBillController         │
//! │                                                                         │
//! │  EventRegistry ◄── register() ── both controllers                       │
//! │                                                                         │
//! │  BillListController ──► StoreGateway.bills().list()                     │
//! │                     ──► Navigator.navigate(NewBill)                     │
//! │                     ──► BillsView.show_preview(url)                     │
//! │                                                                         │
//! │  NewBillController  ──► StoreGateway.create(file)                       │
//! │                     ──► StoreGateway.bills().update(bill)               │
//! │                     ──► Navigator.navigate(Bills)                       │
//! │                     ──► ErrorReporter.report(err)  (on rejection)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod controllers;
pub mod error;
pub mod navigation;
pub mod reporter;
pub mod session;
pub mod view;

use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::ClientConfig;
pub use controllers::{BillListController, NewBillController, SubmissionState, SubmitOutcome};
pub use error::{ClientError, ClientResult};
pub use navigation::{HistoryNavigator, Navigator, Route};
pub use reporter::{ErrorReporter, TracingReporter};
pub use session::{MemorySessionStore, SessionContext, SessionStore};
pub use view::{
    BillsView, DispatchOutcome, EventRegistry, NewBillView, NoOpView, ViewEvent, ViewEventKind,
};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=billed_client=trace` - Show trace for the controllers only
/// - Otherwise `default_filter` (see `[logging] filter` in `billed.toml`)
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
    {
        info!("Billed client logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        let config = ClientConfig::default();
        assert!(!config.logging.filter.is_empty());

        init_tracing(&config.logging.filter);
        init_tracing(&config.logging.filter);

        tracing::debug!("still logging after a second init");
    }
}
