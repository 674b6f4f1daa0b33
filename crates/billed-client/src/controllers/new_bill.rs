//! # New Bill Controller
//!
//! Owns the new-bill form: proof file selection, then a two-step
//! submission (file upload, then metadata update), then navigation.
//!
//! ## Submission State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │             valid file                     submit                       │
//! │   ┌──────┐ ───────────► ┌──────────────┐ ─────────► ┌────────────┐     │
//! │   │ Idle │              │ FileSelected │            │ Submitting │     │
//! │   └──────┘ ◄─────────── └──────────────┘            └─────┬──────┘     │
//! │       ▲      wrong type        ▲                          │            │
//! │       │   (alert, input        │ valid file         ┌─────┴──────┐     │
//! │       │    cleared)            │                    ▼            ▼     │
//! │       │                  ┌─────┴──┐  submit   ┌─────────┐  ┌────────┐  │
//! │       └──────────────────│ Failed │ ◄──────── │ create/ │  │Success │  │
//! │          wrong type      └────────┘  again ok │ update  │  │→ Bills │  │
//! │                                               │ rejected│  └────────┘  │
//! │                                               └─────────┘              │
//! │                                                                         │
//! │  While Submitting, another submit returns SubmitInProgress.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Store Call Order
//! `create(file)` is awaited before `bills().update(bill)` is issued; the
//! updated bill carries the returned `fileUrl` and uses the returned key as
//! its id.

use std::sync::{Arc, Mutex};

use billed_core::validation::validate_proof_content_type;
use billed_core::{Bill, NewBillForm, SelectedFile};
use billed_store::{FileUpload, StoreError, StoreGateway};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, UploadConfig};
use crate::error::{ClientError, ClientResult};
use crate::navigation::{Navigator, Route};
use crate::reporter::{ErrorReporter, TracingReporter};
use crate::session::SessionContext;
use crate::view::{EventRegistry, NewBillView, ViewEvent, ViewEventKind};

// =============================================================================
// State
// =============================================================================

/// Where the form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionState {
    #[default]
    Idle,
    FileSelected,
    Submitting,
    Success,
    Failed,
}

/// How a submission that reached the store ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Both calls succeeded; holds the persisted bill.
    Submitted(Bill),

    /// A store call was rejected. The error has already been reported.
    Failed(StoreError),
}

/// Releases the submit lock if a submission is abandoned mid-flight.
///
/// A `submit` future dropped while awaiting the store would otherwise leave
/// the form in `Submitting` for good. On drop the state moves to `Failed`
/// when it is still `Submitting`; settled submissions are left as they are.
struct SubmitLock<'a> {
    draft: &'a Mutex<Draft>,
}

impl Drop for SubmitLock<'_> {
    fn drop(&mut self) {
        let mut draft = self.draft.lock().expect("Draft mutex poisoned");
        if draft.state == SubmissionState::Submitting {
            warn!("Submission abandoned before the store answered");
            draft.state = SubmissionState::Failed;
        }
    }
}

/// Client-only state of the form, dropped with the controller.
#[derive(Debug, Default)]
struct Draft {
    state: SubmissionState,
    file: Option<SelectedFile>,
    file_name: Option<String>,
    file_url: Option<String>,
    bill_id: Option<String>,
}

// =============================================================================
// Controller
// =============================================================================

/// Controller of the new-bill form.
pub struct NewBillController {
    store: Arc<dyn StoreGateway>,
    navigator: Arc<dyn Navigator>,
    view: Arc<dyn NewBillView>,
    reporter: Arc<dyn ErrorReporter>,
    session: SessionContext,
    upload: UploadConfig,
    default_pct: u32,
    draft: Mutex<Draft>,
}

impl NewBillController {
    /// Creates the controller with a [`TracingReporter`].
    pub fn new(
        store: Arc<dyn StoreGateway>,
        navigator: Arc<dyn Navigator>,
        view: Arc<dyn NewBillView>,
        session: SessionContext,
        config: &ClientConfig,
    ) -> Self {
        NewBillController {
            store,
            navigator,
            view,
            reporter: Arc::new(TracingReporter),
            session,
            upload: config.upload.clone(),
            default_pct: config.default_pct(),
            draft: Mutex::new(Draft::default()),
        }
    }

    /// Replaces the error reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> SubmissionState {
        self.draft.lock().expect("Draft mutex poisoned").state
    }

    /// Name of the accepted proof file, `None` when no valid file is selected.
    pub fn file_name(&self) -> Option<String> {
        self.draft
            .lock()
            .expect("Draft mutex poisoned")
            .file_name
            .clone()
    }

    /// Proof URL returned by the last successful upload of this draft.
    pub fn file_url(&self) -> Option<String> {
        self.draft
            .lock()
            .expect("Draft mutex poisoned")
            .file_url
            .clone()
    }

    /// Key the store filed the proof under, reused as the bill id.
    pub fn bill_id(&self) -> Option<String> {
        self.draft
            .lock()
            .expect("Draft mutex poisoned")
            .bill_id
            .clone()
    }

    // =========================================================================
    // File Selection
    // =========================================================================

    /// Handles a file picked in the `file` input.
    ///
    /// Only the declared content type is checked. A wrong type raises the
    /// configured alert, clears the input and forgets any earlier file; no
    /// store call is made either way.
    pub fn on_file_change(&self, file: SelectedFile) -> ClientResult<()> {
        let checked =
            validate_proof_content_type(&file.content_type, &self.upload.allowed_content_types);

        if let Err(e) = checked {
            warn!(
                file_name = %file.name,
                content_type = %file.content_type,
                "Rejected proof file"
            );
            self.view.alert(&self.upload.invalid_type_message);
            self.view.clear_file_input();

            let mut draft = self.draft.lock().expect("Draft mutex poisoned");
            draft.file = None;
            draft.file_name = None;
            if draft.state != SubmissionState::Submitting {
                draft.state = SubmissionState::Idle;
            }
            return Err(e.into());
        }

        debug!(file_name = %file.name, content_type = %file.content_type, "Proof file selected");

        let mut draft = self.draft.lock().expect("Draft mutex poisoned");
        draft.file_name = Some(file.name.clone());
        draft.file = Some(file);
        if draft.state != SubmissionState::Submitting {
            draft.state = SubmissionState::FileSelected;
        }
        Ok(())
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Submits the form.
    ///
    /// Dropping the returned future before it settles releases the submit
    /// lock and leaves the form in `Failed`.
    ///
    /// ## Returns
    /// - `Ok(Submitted)` after both store calls succeed; navigates to the list
    /// - `Ok(Failed)` when a store call is rejected; the error is reported,
    ///   fields and file are kept, nothing is retried
    ///
    /// ## Errors
    /// Returned before any store call:
    /// - `SubmitInProgress` while an earlier submit has not settled
    /// - `NoFileSelected` without a valid proof file
    /// - `Validation` for a bad date or expense type
    pub async fn submit(&self, form: NewBillForm) -> ClientResult<SubmitOutcome> {
        let bill = form.to_draft(self.session.user(), self.default_pct)?;

        let file = {
            let mut draft = self.draft.lock().expect("Draft mutex poisoned");
            if draft.state == SubmissionState::Submitting {
                debug!("Submit ignored, previous submission still running");
                return Err(ClientError::SubmitInProgress);
            }
            let file = draft.file.clone().ok_or(ClientError::NoFileSelected)?;
            draft.state = SubmissionState::Submitting;
            file
        };
        let _lock = SubmitLock { draft: &self.draft };

        info!(
            email = %bill.email,
            expense_type = %bill.expense_type,
            amount = bill.amount,
            "Submitting bill"
        );

        let upload = FileUpload::from_selected(&file, self.session.email());
        let uploaded = match self.store.create(upload).await {
            Ok(uploaded) => uploaded,
            Err(e) => return Ok(self.fail("create", e)),
        };

        {
            let mut draft = self.draft.lock().expect("Draft mutex poisoned");
            draft.file_url = Some(uploaded.file_url.clone());
            draft.bill_id = Some(uploaded.file_id.clone());
        }
        debug!(bill_id = %uploaded.file_id, file_url = %uploaded.file_url, "Proof uploaded");

        let mut bill = bill.with_proof(uploaded.file_url, file.name.clone());
        bill.id = Some(uploaded.file_id);

        match self.store.bills().update(bill).await {
            Ok(saved) => {
                let mut draft = self.draft.lock().expect("Draft mutex poisoned");
                // A file picked while the calls were running is kept.
                let next = draft.file.take().filter(|f| *f != file);
                *draft = Draft {
                    state: SubmissionState::Success,
                    file_name: next.as_ref().map(|f| f.name.clone()),
                    file: next,
                    ..Draft::default()
                };
                drop(draft);
                info!(bill_id = ?saved.id, "Bill submitted");
                self.navigator.navigate(Route::Bills);
                Ok(SubmitOutcome::Submitted(saved))
            }
            Err(e) => Ok(self.fail("update", e)),
        }
    }

    fn fail(&self, context: &str, error: StoreError) -> SubmitOutcome {
        self.reporter.report(context, &error);
        self.draft.lock().expect("Draft mutex poisoned").state = SubmissionState::Failed;
        SubmitOutcome::Failed(error)
    }

    /// Binds the form events onto `registry`.
    pub fn register(self: &Arc<Self>, registry: &EventRegistry) {
        let this = Arc::clone(self);
        registry.on(ViewEventKind::Submit, move |event| {
            let this = Arc::clone(&this);
            async move {
                if let ViewEvent::Submit(form) = event {
                    if let Err(e) = this.submit(form).await {
                        warn!(error = %e, "Submit not sent");
                    }
                }
            }
        });

        let this = Arc::clone(self);
        registry.on(ViewEventKind::FileChange, move |event| {
            let this = Arc::clone(&this);
            async move {
                if let ViewEvent::FileChange(file) = event {
                    // Rejections are already surfaced through the view.
                    let _ = this.on_file_change(file);
                }
            }
        });
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigator;
    use async_trait::async_trait;
    use billed_core::{BillStatus, CurrentUser, INVALID_FILE_TYPE_MESSAGE};
    use billed_store::{
        BillsCollection, MemoryStore, StoreOperation, StoreResult, UploadedFile,
    };
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct RecordingView {
        alerts: Mutex<Vec<String>>,
        clears: Mutex<usize>,
    }

    impl NewBillView for RecordingView {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }

        fn clear_file_input(&self) {
            *self.clears.lock().unwrap() += 1;
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        reports: Mutex<Vec<(String, StoreError)>>,
    }

    impl ErrorReporter for RecordingReporter {
        fn report(&self, context: &str, error: &StoreError) {
            self.reports
                .lock()
                .unwrap()
                .push((context.to_string(), error.clone()));
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        navigator: Arc<HistoryNavigator>,
        view: Arc<RecordingView>,
        reporter: Arc<RecordingReporter>,
        controller: NewBillController,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let navigator = Arc::new(HistoryNavigator::starting_at(Route::NewBill));
        let view = Arc::new(RecordingView::default());
        let reporter = Arc::new(RecordingReporter::default());
        let controller = NewBillController::new(
            store.clone(),
            navigator.clone(),
            view.clone(),
            SessionContext::new(CurrentUser::employee("a@a")),
            &ClientConfig::default(),
        )
        .with_reporter(reporter.clone());

        Fixture {
            store,
            navigator,
            view,
            reporter,
            controller,
        }
    }

    fn png() -> SelectedFile {
        SelectedFile::new("file.png", "image/png", &b"png"[..])
    }

    fn form() -> NewBillForm {
        NewBillForm {
            expense_type: "Transports".to_string(),
            name: "Vol Paris Londres".to_string(),
            date: "2004-04-04".to_string(),
            amount: "348".to_string(),
            vat: "70".to_string(),
            pct: String::new(),
            commentary: String::new(),
        }
    }

    #[test]
    fn test_valid_file_is_kept() {
        let f = fixture();
        f.controller.on_file_change(png()).unwrap();

        assert_eq!(f.controller.file_name().as_deref(), Some("file.png"));
        assert_eq!(f.controller.state(), SubmissionState::FileSelected);
        assert!(f.view.alerts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_wrong_type_alerts_and_resets() {
        let f = fixture();
        f.controller.on_file_change(png()).unwrap();

        let pdf = SelectedFile::new("file.pdf", "application/pdf", &b"pdf"[..]);
        assert!(matches!(
            f.controller.on_file_change(pdf),
            Err(ClientError::Validation(_))
        ));

        assert_eq!(
            *f.view.alerts.lock().unwrap(),
            vec![INVALID_FILE_TYPE_MESSAGE.to_string()]
        );
        assert_eq!(*f.view.clears.lock().unwrap(), 1);
        assert_eq!(f.controller.file_name(), None);
        assert_eq!(f.controller.state(), SubmissionState::Idle);
        assert_eq!(f.store.call_count(StoreOperation::Create), 0);
    }

    #[test]
    fn test_extension_is_not_trusted() {
        let f = fixture();
        let disguised = SelectedFile::new("photo.png", "text/plain", &b"txt"[..]);
        assert!(f.controller.on_file_change(disguised).is_err());
        assert_eq!(f.controller.file_name(), None);
    }

    #[tokio::test]
    async fn test_submit_uploads_then_updates_then_navigates() {
        let f = fixture();
        f.controller.on_file_change(png()).unwrap();

        let outcome = f.controller.submit(form()).await.unwrap();
        let SubmitOutcome::Submitted(bill) = outcome else {
            panic!("expected a submitted bill");
        };

        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.email, "a@a");
        assert_eq!(bill.pct, 20);
        assert_eq!(bill.file_name.as_deref(), Some("file.png"));
        let file_url = bill.file_url.clone().unwrap();
        let bill_id = bill.id.clone().unwrap();
        assert!(file_url.contains(&bill_id));

        assert_eq!(f.store.call_count(StoreOperation::Create), 1);
        assert_eq!(f.store.call_count(StoreOperation::Update), 1);
        assert_eq!(f.navigator.current(), Some(Route::Bills));
        assert_eq!(f.controller.state(), SubmissionState::Success);
        assert_eq!(f.controller.file_name(), None);
    }

    #[tokio::test]
    async fn test_submit_without_file() {
        let f = fixture();
        assert!(matches!(
            f.controller.submit(form()).await,
            Err(ClientError::NoFileSelected)
        ));
        assert_eq!(f.store.call_count(StoreOperation::Create), 0);
        assert_eq!(f.controller.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_submit_with_bad_date_touches_nothing() {
        let f = fixture();
        f.controller.on_file_change(png()).unwrap();

        let mut bad = form();
        bad.date = "04/04/2004".to_string();
        assert!(matches!(
            f.controller.submit(bad).await,
            Err(ClientError::Validation(_))
        ));
        assert_eq!(f.store.call_count(StoreOperation::Create), 0);
        assert_eq!(f.controller.state(), SubmissionState::FileSelected);
    }

    #[tokio::test]
    async fn test_create_rejection_is_reported() {
        let f = fixture();
        f.controller.on_file_change(png()).unwrap();
        f.store
            .fail_next(StoreOperation::Create, StoreError::rejected("500"));

        let outcome = f.controller.submit(form()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Failed(StoreError::rejected("500")));

        let reports = f.reporter.reports.lock().unwrap().clone();
        assert_eq!(
            reports,
            vec![("create".to_string(), StoreError::rejected("500"))]
        );
        assert_eq!(f.store.call_count(StoreOperation::Update), 0);
        assert_eq!(f.navigator.current(), Some(Route::NewBill));
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_file_and_allows_retry() {
        let f = fixture();
        f.controller.on_file_change(png()).unwrap();
        f.store
            .fail_next(StoreOperation::Update, StoreError::rejected("404"));

        let first = f.controller.submit(form()).await.unwrap();
        assert!(matches!(first, SubmitOutcome::Failed(_)));
        assert_eq!(f.controller.state(), SubmissionState::Failed);
        assert_eq!(f.controller.file_name().as_deref(), Some("file.png"));
        assert!(f.controller.bill_id().is_some());
        assert!(f.controller.file_url().is_some());

        let second = f.controller.submit(form()).await.unwrap();
        assert!(matches!(second, SubmitOutcome::Submitted(_)));
        assert_eq!(f.store.call_count(StoreOperation::Create), 2);
        assert_eq!(f.reporter.reports.lock().unwrap().len(), 1);
    }

    /// Uploads that can be held back: the first one never settles while
    /// `stall` is set, and every one waits for `release` while `gate` is set.
    #[derive(Default)]
    struct HeldStore {
        inner: MemoryStore,
        stall: AtomicBool,
        gate: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl StoreGateway for HeldStore {
        fn bills(&self) -> &dyn BillsCollection {
            self.inner.bills()
        }

        async fn create(&self, upload: FileUpload) -> StoreResult<UploadedFile> {
            if self.stall.swap(false, Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            if self.gate.load(Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.inner.create(upload).await
        }
    }

    fn held_controller(store: Arc<HeldStore>) -> NewBillController {
        NewBillController::new(
            store,
            Arc::new(HistoryNavigator::starting_at(Route::NewBill)),
            Arc::new(RecordingView::default()),
            SessionContext::new(CurrentUser::employee("a@a")),
            &ClientConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_abandoned_submit_releases_the_lock() {
        let store = Arc::new(HeldStore {
            stall: AtomicBool::new(true),
            ..HeldStore::default()
        });
        let controller = held_controller(store.clone());
        controller.on_file_change(png()).unwrap();

        tokio::select! {
            biased;
            _ = controller.submit(form()) => panic!("stalled upload settled"),
            _ = async {} => {}
        }

        assert_eq!(controller.state(), SubmissionState::Failed);
        assert_eq!(controller.file_name().as_deref(), Some("file.png"));

        let retry = controller.submit(form()).await.unwrap();
        assert!(matches!(retry, SubmitOutcome::Submitted(_)));
        assert_eq!(controller.state(), SubmissionState::Success);
        assert_eq!(store.inner.call_count(StoreOperation::Update), 1);
    }

    #[tokio::test]
    async fn test_file_picked_during_submit_survives_success() {
        let store = Arc::new(HeldStore {
            gate: AtomicBool::new(true),
            ..HeldStore::default()
        });
        let controller = held_controller(store.clone());
        controller.on_file_change(png()).unwrap();

        let submit = controller.submit(form());
        let pick = async {
            store.entered.notified().await;
            let next = SelectedFile::new("second.jpg", "image/jpeg", &b"jpg"[..]);
            controller.on_file_change(next).unwrap();
            assert_eq!(controller.state(), SubmissionState::Submitting);
            store.release.notify_one();
        };
        let (outcome, ()) = tokio::join!(submit, pick);

        let SubmitOutcome::Submitted(bill) = outcome.unwrap() else {
            panic!("expected a submitted bill");
        };
        assert_eq!(bill.file_name.as_deref(), Some("file.png"));
        assert_eq!(controller.state(), SubmissionState::Success);
        assert_eq!(controller.file_name().as_deref(), Some("second.jpg"));
    }
}
