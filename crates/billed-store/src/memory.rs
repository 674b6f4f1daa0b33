//! # In-Memory Store
//!
//! A [`StoreGateway`] kept entirely in process memory. It behaves like the
//! remote store for the calls the controllers make, and lets tests queue
//! rejections per operation.
//!
//! ## Behaviour
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(upload)  → keeps bytes under a fresh id                         │
//! │                    → { fileUrl: "memory://bills/{id}/{name}", fileId }  │
//! │  bills().update  → upsert by id (id assigned when absent), echo record  │
//! │  bills().list    → records in insertion order                           │
//! │                                                                         │
//! │  fail_next(op, err) → the next call to `op` returns `err` instead       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use billed_core::{Bill, BillRecord};
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::gateway::{decode_bill_list, BillsCollection, FileUpload, StoreGateway, UploadedFile};

/// Operations of the store, for fault injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    List,
    Update,
    Create,
}

/// A file kept by [`MemoryStore::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_name: String,
    pub content_type: String,
    pub email: String,
    pub data: Bytes,
}

// =============================================================================
// Probe (faults + call counts)
// =============================================================================

#[derive(Debug, Default)]
struct Probe {
    faults: Mutex<HashMap<StoreOperation, VecDeque<StoreError>>>,
    calls: Mutex<HashMap<StoreOperation, usize>>,
}

impl Probe {
    /// Counts the call and pops a queued fault for it, if any.
    fn enter(&self, op: StoreOperation) -> StoreResult<()> {
        *self
            .calls
            .lock()
            .expect("Store probe mutex poisoned")
            .entry(op)
            .or_default() += 1;

        let fault = self
            .faults
            .lock()
            .expect("Store probe mutex poisoned")
            .get_mut(&op)
            .and_then(VecDeque::pop_front);

        match fault {
            Some(err) => {
                debug!(?op, error = %err, "Injected store fault");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

// =============================================================================
// Bills Collection
// =============================================================================

/// The `bills` collection of a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryBills {
    records: RwLock<Vec<BillRecord>>,
    probe: Arc<Probe>,
}

#[async_trait]
impl BillsCollection for MemoryBills {
    async fn list(&self) -> StoreResult<Vec<BillRecord>> {
        self.probe.enter(StoreOperation::List)?;

        let records = self.records.read().await.clone();
        debug!(count = records.len(), "Listed bills");
        Ok(records)
    }

    async fn update(&self, mut bill: Bill) -> StoreResult<Bill> {
        self.probe.enter(StoreOperation::Update)?;

        let id = bill
            .id
            .get_or_insert_with(|| Uuid::new_v4().simple().to_string())
            .clone();
        let record = BillRecord::from(&bill);

        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }

        debug!(bill_id = %id, "Upserted bill");
        Ok(bill)
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory [`StoreGateway`].
///
/// ## Usage
/// ```rust,ignore
/// let store = MemoryStore::new();
/// store.fail_next(StoreOperation::Update, StoreError::rejected("500"));
///
/// let uploaded = store.create(upload).await?;      // ok
/// let err = store.bills().update(bill).await;      // Err(Rejected("500"))
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    bills: MemoryBills,
    files: RwLock<HashMap<String, StoredFile>>,
    probe: Arc<Probe>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Creates a store whose bills collection starts with `records`.
    ///
    /// Records are kept as given, malformed dates or statuses included.
    pub fn with_records(records: Vec<BillRecord>) -> Self {
        let probe = Arc::new(Probe::default());
        MemoryStore {
            bills: MemoryBills {
                records: RwLock::new(records),
                probe: Arc::clone(&probe),
            },
            files: RwLock::new(HashMap::new()),
            probe,
        }
    }

    /// Creates a store seeded from a `list` answer body.
    pub fn from_json(payload: &str) -> StoreResult<Self> {
        Ok(Self::with_records(decode_bill_list(payload)?))
    }

    /// Queues `err` as the result of the next call to `op`.
    pub fn fail_next(&self, op: StoreOperation, err: StoreError) {
        self.probe
            .faults
            .lock()
            .expect("Store probe mutex poisoned")
            .entry(op)
            .or_default()
            .push_back(err);
    }

    /// Number of calls made to `op` so far, failed ones included.
    pub fn call_count(&self, op: StoreOperation) -> usize {
        self.probe
            .calls
            .lock()
            .expect("Store probe mutex poisoned")
            .get(&op)
            .copied()
            .unwrap_or(0)
    }

    /// Returns the file stored under `file_id`.
    pub async fn file(&self, file_id: &str) -> StoreResult<StoredFile> {
        self.files
            .read()
            .await
            .get(file_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("file {}", file_id)))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreGateway for MemoryStore {
    fn bills(&self) -> &dyn BillsCollection {
        &self.bills
    }

    async fn create(&self, upload: FileUpload) -> StoreResult<UploadedFile> {
        self.probe.enter(StoreOperation::Create)?;

        let file_id = Uuid::new_v4().simple().to_string();
        let file_url = format!("memory://bills/{}/{}", file_id, upload.file_name);

        debug!(
            file_id = %file_id,
            file_name = %upload.file_name,
            size = upload.data.len(),
            "Stored proof file"
        );

        self.files.write().await.insert(
            file_id.clone(),
            StoredFile {
                file_name: upload.file_name,
                content_type: upload.content_type,
                email: upload.email,
                data: upload.data,
            },
        );

        Ok(UploadedFile { file_url, file_id })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
