//! # Store Gateway
//!
//! The collection-style view of the remote store that the controllers use.
//!
//! ```text
//! store.bills().list()          ──► Vec<BillRecord>
//! store.bills().update(bill)    ──► Bill (persisted, echoed)
//! store.create(upload)          ──► UploadedFile { fileUrl, fileId }
//! ```
//!
//! All calls are async and may be rejected with a [`StoreError`]. No timeout
//! or cancellation is applied here; a call that never settles keeps its
//! caller waiting.
//!
//! [`StoreError`]: crate::StoreError

use async_trait::async_trait;
use billed_core::{Bill, BillRecord, SelectedFile};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

// =============================================================================
// Upload Payloads
// =============================================================================

/// A proof file on its way to the store, tagged with its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
    /// Owner of the bill the file proves.
    pub email: String,
}

impl FileUpload {
    /// Builds the upload for a file picked in the form.
    pub fn from_selected(file: &SelectedFile, email: impl Into<String>) -> Self {
        FileUpload {
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            data: file.data.clone(),
            email: email.into(),
        }
    }
}

/// What the store answers to a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Where the proof can be fetched from.
    pub file_url: String,

    /// Key the store filed the upload under; the metadata update reuses it
    /// as the bill id.
    #[serde(alias = "key")]
    pub file_id: String,
}

// =============================================================================
// List Payload
// =============================================================================

/// Decodes the body of a `list` answer.
///
/// Each record is decoded leniently (see [`BillRecord`]); only a body that
/// is not a JSON array of objects fails, with `StoreError::InvalidPayload`.
pub fn decode_bill_list(payload: &str) -> StoreResult<Vec<BillRecord>> {
    Ok(serde_json::from_str(payload)?)
}

// =============================================================================
// Traits
// =============================================================================

/// The `bills` collection of the store.
#[async_trait]
pub trait BillsCollection: Send + Sync {
    /// Lists the bills visible to the current user, in store order.
    async fn list(&self) -> StoreResult<Vec<BillRecord>>;

    /// Upserts `bill` and returns the persisted record.
    async fn update(&self, bill: Bill) -> StoreResult<Bill>;
}

/// Entry point to the remote store.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// The bills collection.
    fn bills(&self) -> &dyn BillsCollection;

    /// Uploads a proof file.
    async fn create(&self, upload: FileUpload) -> StoreResult<UploadedFile>;
}
