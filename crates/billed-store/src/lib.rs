//! # billed-store: Remote Store Boundary for Billed
//!
//! The controllers never talk to the remote store directly; they hold an
//! `Arc<dyn StoreGateway>`. This crate defines that boundary and ships an
//! in-memory implementation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Billed Data Flow                                 │
//! │                                                                         │
//! │  BillListController            NewBillController                        │
//! │       │ bills().list()              │ create(file) → bills().update()   │
//! │       ▼                             ▼                                   │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   billed-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ StoreGateway  │    │ BillsCollect- │    │ MemoryStore  │  │   │
//! │  │   │  create()     │───►│ ion           │    │ (in process) │  │   │
//! │  │   │  bills()      │    │ list/update   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Remote store (HTTP, outside this workspace)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`gateway`] - `StoreGateway` / `BillsCollection` traits, upload payloads
//! - [`memory`] - `MemoryStore`
//! - [`error`] - `StoreError`

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gateway;
pub mod memory;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use gateway::{decode_bill_list, BillsCollection, FileUpload, StoreGateway, UploadedFile};
pub use memory::{MemoryStore, StoreOperation, StoredFile};
