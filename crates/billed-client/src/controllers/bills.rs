//! # Bill List Controller
//!
//! Fetches the employee's bills, formats them for display, orders them
//! newest first, and wires the list-level actions.
//!
//! ## Fetch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch_bills()                                                          │
//! │    │                                                                    │
//! │    ├─► store.bills().list() ──── Err ──► ClientError::Store            │
//! │    │         │ Ok(records)                                              │
//! │    ▼         ▼                                                          │
//! │  order_anti_chronologically(records)      2004 ... 2001, undated last   │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  BillListItem::from_record(record)        per record, never fails:     │
//! │    date   → Formatted("4 Avr. 04") | Raw("garbage")                     │
//! │    status → Formatted("En attente") | Raw("archived")                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use billed_core::format::order_anti_chronologically;
use billed_core::{BillListItem, Locale};
use billed_store::StoreGateway;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::navigation::{Navigator, Route};
use crate::session::SessionContext;
use crate::view::{BillsView, EventRegistry, ViewEvent, ViewEventKind};

/// Controller of the bill list screen.
pub struct BillListController {
    store: Arc<dyn StoreGateway>,
    navigator: Arc<dyn Navigator>,
    view: Arc<dyn BillsView>,
    session: SessionContext,
    locale: Locale,
}

impl BillListController {
    pub fn new(
        store: Arc<dyn StoreGateway>,
        navigator: Arc<dyn Navigator>,
        view: Arc<dyn BillsView>,
        session: SessionContext,
        config: &ClientConfig,
    ) -> Self {
        BillListController {
            store,
            navigator,
            view,
            session,
            locale: config.locale(),
        }
    }

    /// Lists the bills, newest first, with display fields.
    ///
    /// A record whose date or status cannot be formatted keeps its raw value
    /// for that field; only a failing list call makes this return `Err`.
    pub async fn fetch_bills(&self) -> ClientResult<Vec<BillListItem>> {
        let mut records = self.store.bills().list().await.map_err(|e| {
            error!(error = %e, email = self.session.email(), "Failed to list bills");
            e
        })?;

        order_anti_chronologically(&mut records);

        let items: Vec<BillListItem> = records
            .into_iter()
            .map(|record| BillListItem::from_record(record, self.locale))
            .collect();

        for item in items.iter().filter(|i| i.is_degraded()) {
            warn!(
                bill_id = item.id(),
                date = item.date.as_str(),
                status = item.status.as_str(),
                "Showing raw values for malformed bill"
            );
        }

        debug!(count = items.len(), email = self.session.email(), "Fetched bills");
        Ok(items)
    }

    /// `btn-new-bill`: goes to the new-bill form.
    pub fn on_new_bill_click(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    /// `icon-eye`: opens the proof preview. No store access.
    pub fn on_eye_icon_click(&self, file_url: &str) {
        debug!(file_url, "Opening proof preview");
        self.view.show_preview(file_url);
    }

    /// Binds the list actions onto `registry`.
    pub fn register(self: &Arc<Self>, registry: &EventRegistry) {
        let this = Arc::clone(self);
        registry.on(ViewEventKind::NewBillClick, move |_| {
            let this = Arc::clone(&this);
            async move { this.on_new_bill_click() }
        });

        let this = Arc::clone(self);
        registry.on(ViewEventKind::EyeClick, move |event| {
            let this = Arc::clone(&this);
            async move {
                if let ViewEvent::EyeClick { file_url } = event {
                    this.on_eye_icon_click(&file_url);
                }
            }
        });
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
