//! Shared fixtures and recording fakes for the page tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use billed_client::{
    BillListController, BillsView, ClientConfig, ErrorReporter, EventRegistry, HistoryNavigator,
    MemorySessionStore, NewBillController, NewBillView, Route, SessionContext, SessionStore,
};
use billed_core::{BillRecord, NewBillForm, SelectedFile};
use billed_store::{decode_bill_list, MemoryStore, StoreError};

/// The four bills of the employee `a@a`, in store order.
pub const FIXTURE_BILLS: &str = r#"[
  {
    "id": "47qAXb6fIm2zOKkLzMro",
    "vat": "80",
    "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.a…f-1.jpg?alt=media&token=c1640e12-a24b-4b11-ae52-529112e9602a",
    "status": "pending",
    "type": "Hôtel et logement",
    "commentary": "séminaire billed",
    "name": "encore",
    "fileName": "preview-facture-free-201801-pdf-1.jpg",
    "date": "2004-04-04",
    "amount": 400,
    "commentAdmin": "ok",
    "email": "a@a",
    "pct": 20
  },
  {
    "id": "UIUZtnPQvnbFnB0ozvJh",
    "vat": "60",
    "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.a…dur.png?alt=media&token=571d34cb-9c8f-430a-af52-66221cae1da3",
    "status": "accepted",
    "type": "Services en ligne",
    "commentary": "",
    "name": "test3",
    "fileName": "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
    "date": "2003-03-03",
    "amount": 300,
    "commentAdmin": "bon bah d'accord",
    "email": "a@a",
    "pct": 20
  },
  {
    "id": "BeKy5Mo4jkmdfPGYpTxZ",
    "vat": "",
    "amount": 100,
    "name": "test1",
    "fileName": "1592770761.jpeg",
    "commentary": "plop",
    "pct": 20,
    "type": "Transports",
    "email": "a@a",
    "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.a…61.jpeg?alt=media&token=7685cd61-c112-42bc-9929-8a799bb82d8b",
    "date": "2001-01-01",
    "status": "refused",
    "commentAdmin": "en fait non"
  },
  {
    "id": "qcCK3SzECmaZAGRrHjaC",
    "status": "refused",
    "pct": 20,
    "amount": 200,
    "email": "a@a",
    "name": "test2",
    "vat": "40",
    "fileName": "preview-facture-free-201801-pdf-1.jpg",
    "date": "2002-02-02",
    "commentAdmin": "pas la bonne facture",
    "commentary": "test2",
    "type": "Restaurants et bars",
    "fileUrl": "https://test.storage.tld/v0/b/billable-677b6.a…f-1.jpg?alt=media&token=4df6ed2c-12c8-42a2-b013-346c1346f732"
  }
]"#;

pub fn fixture_bills() -> Vec<BillRecord> {
    decode_bill_list(FIXTURE_BILLS).expect("fixture bills are valid JSON")
}

/// Signs `{"type":"Employee","email":"a@a"}` into a fresh session store.
pub fn employee_session() -> SessionContext {
    let store = MemorySessionStore::new();
    store.set_item("user", r#"{"type":"Employee","email":"a@a"}"#.to_string());
    SessionContext::load(&store).expect("employee session")
}

pub fn png_file() -> SelectedFile {
    SelectedFile::new("file.png", "image/png", &b"\x89PNG"[..])
}

pub fn pdf_file() -> SelectedFile {
    SelectedFile::new("file.pdf", "application/pdf", &b"%PDF"[..])
}

pub fn filled_form() -> NewBillForm {
    let mut form = NewBillForm::default();
    form.set_field("expense-type", "Transports");
    form.set_field("expense-name", "Vol Paris Londres");
    form.set_field("datepicker", "2022-02-02");
    form.set_field("amount", "348");
    form.set_field("vat", "70");
    form.set_field("pct", "20");
    form.set_field("commentary", "séminaire");
    form
}

// =============================================================================
// Recording fakes
// =============================================================================

#[derive(Default)]
pub struct RecordingView {
    pub previews: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<String>>,
    pub file_input_clears: Mutex<usize>,
}

impl BillsView for RecordingView {
    fn show_preview(&self, file_url: &str) {
        self.previews.lock().unwrap().push(file_url.to_string());
    }
}

impl NewBillView for RecordingView {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn clear_file_input(&self) {
        *self.file_input_clears.lock().unwrap() += 1;
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub errors: Mutex<Vec<StoreError>>,
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, _context: &str, error: &StoreError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}

// =============================================================================
// Pages
// =============================================================================

/// Bills page wired onto a registry.
pub struct BillsPage {
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<HistoryNavigator>,
    pub view: Arc<RecordingView>,
    pub registry: EventRegistry,
    pub controller: Arc<BillListController>,
}

impl BillsPage {
    pub fn open(store: Arc<MemoryStore>) -> Self {
        let navigator = Arc::new(HistoryNavigator::starting_at(Route::Bills));
        let view = Arc::new(RecordingView::default());
        let registry = EventRegistry::new();
        let controller = Arc::new(BillListController::new(
            store.clone(),
            navigator.clone(),
            view.clone(),
            employee_session(),
            &ClientConfig::default(),
        ));
        controller.register(&registry);

        BillsPage {
            store,
            navigator,
            view,
            registry,
            controller,
        }
    }
}

/// New-bill page wired onto a registry.
pub struct NewBillPage {
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<HistoryNavigator>,
    pub view: Arc<RecordingView>,
    pub reporter: Arc<RecordingReporter>,
    pub registry: EventRegistry,
    pub controller: Arc<NewBillController>,
}

impl NewBillPage {
    pub fn open(store: Arc<MemoryStore>) -> Self {
        let navigator = Arc::new(HistoryNavigator::starting_at(Route::NewBill));
        let view = Arc::new(RecordingView::default());
        let reporter = Arc::new(RecordingReporter::default());
        let registry = EventRegistry::new();
        let controller = Arc::new(
            NewBillController::new(
                store.clone(),
                navigator.clone(),
                view.clone(),
                employee_session(),
                &ClientConfig::default(),
            )
            .with_reporter(reporter.clone()),
        );
        controller.register(&registry);

        NewBillPage {
            store,
            navigator,
            view,
            reporter,
            registry,
            controller,
        }
    }
}
