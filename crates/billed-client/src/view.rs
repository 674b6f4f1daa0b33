//! # View Surface
//!
//! The seam between the controllers and whatever renders the screens.
//!
//! ## Inbound: events
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Renderer                     EventRegistry             Controller      │
//! │  ────────                     ─────────────             ──────────      │
//! │  submit button ──► Submit(form) ─────► handler[Submit] ──► submit()     │
//! │  file input ─────► FileChange(file) ─► handler[FileChange] ─► on_file.. │
//! │  btn-new-bill ───► NewBillClick ─────► handler[NewBillClick] ─► nav     │
//! │  icon-eye ───────► EyeClick{url} ────► handler[EyeClick] ──► preview    │
//! │                                                                         │
//! │  One handler per kind. Registering again replaces the previous one,    │
//! │  so a dispatch runs exactly one handler.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Outbound: capabilities
//! - [`BillsView::show_preview`] opens the proof modal
//! - [`NewBillView::alert`] / [`NewBillView::clear_file_input`]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use billed_core::{NewBillForm, SelectedFile};
use tracing::debug;

// =============================================================================
// Events
// =============================================================================

/// The capability set a view can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewEventKind {
    Submit,
    FileChange,
    NewBillClick,
    EyeClick,
}

/// An event raised by the view, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The new-bill form was submitted with these values.
    Submit(NewBillForm),

    /// A file was picked in the `file` input.
    FileChange(SelectedFile),

    /// `btn-new-bill` was clicked.
    NewBillClick,

    /// An `icon-eye` was clicked; carries the bill's proof URL.
    EyeClick { file_url: String },
}

impl ViewEvent {
    pub fn kind(&self) -> ViewEventKind {
        match self {
            ViewEvent::Submit(_) => ViewEventKind::Submit,
            ViewEvent::FileChange(_) => ViewEventKind::FileChange,
            ViewEvent::NewBillClick => ViewEventKind::NewBillClick,
            ViewEvent::EyeClick { .. } => ViewEventKind::EyeClick,
        }
    }
}

/// Whether a dispatched event found a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    Unhandled,
}

// =============================================================================
// Event Registry
// =============================================================================

/// Future returned by an event handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A registered handler.
pub type EventHandler = Arc<dyn Fn(ViewEvent) -> HandlerFuture + Send + Sync>;

/// Handlers keyed by event kind.
#[derive(Default)]
pub struct EventRegistry {
    handlers: Mutex<HashMap<ViewEventKind, EventHandler>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, replacing any previous handler.
    ///
    /// Returns true when a handler was replaced.
    pub fn on<F, Fut>(&self, kind: ViewEventKind, handler: F) -> bool
    where
        F: Fn(ViewEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: EventHandler =
            Arc::new(move |event| -> HandlerFuture { Box::pin(handler(event)) });
        let replaced = self
            .handlers
            .lock()
            .expect("Event registry mutex poisoned")
            .insert(kind, handler)
            .is_some();

        debug!(?kind, replaced, "Handler registered");
        replaced
    }

    pub fn is_registered(&self, kind: ViewEventKind) -> bool {
        self.handlers
            .lock()
            .expect("Event registry mutex poisoned")
            .contains_key(&kind)
    }

    /// Runs the handler registered for the event's kind, if any.
    pub async fn dispatch(&self, event: ViewEvent) -> DispatchOutcome {
        let kind = event.kind();
        let handler = self
            .handlers
            .lock()
            .expect("Event registry mutex poisoned")
            .get(&kind)
            .cloned();

        match handler {
            Some(handler) => {
                handler(event).await;
                DispatchOutcome::Handled
            }
            None => {
                debug!(?kind, "No handler for event");
                DispatchOutcome::Unhandled
            }
        }
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<ViewEventKind> = self
            .handlers
            .lock()
            .expect("Event registry mutex poisoned")
            .keys()
            .copied()
            .collect();
        f.debug_struct("EventRegistry").field("kinds", &kinds).finish()
    }
}

// =============================================================================
// Output Capabilities
// =============================================================================

/// What the bill list controller can ask of its view.
pub trait BillsView: Send + Sync {
    /// Shows the proof modal for `file_url`.
    fn show_preview(&self, file_url: &str);
}

/// What the new-bill controller can ask of its view.
pub trait NewBillView: Send + Sync {
    /// Shows a blocking, user-facing message.
    fn alert(&self, message: &str);

    /// Empties the `file` input so no file remains selected.
    fn clear_file_input(&self);
}

/// View that ignores every request.
pub struct NoOpView;

impl BillsView for NoOpView {
    fn show_preview(&self, _file_url: &str) {}
}

impl NewBillView for NoOpView {
    fn alert(&self, _message: &str) {}
    fn clear_file_input(&self) {}
}
