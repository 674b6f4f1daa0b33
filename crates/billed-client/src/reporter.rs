//! # Error Reporter
//!
//! Where store rejections during a submission go. Reporting is
//! fire-and-forget: nothing is retried and nothing is shown to the user.

use billed_store::StoreError;
use tracing::error;

/// Receives store rejections the controller does not return to its caller.
pub trait ErrorReporter: Send + Sync {
    /// `context` names the call that failed (`"create"`, `"update"`).
    fn report(&self, context: &str, error: &StoreError);
}

/// Reports through `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &str, error: &StoreError) {
        error!(context, error = %error, "Store call failed");
    }
}
