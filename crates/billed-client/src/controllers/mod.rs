//! # Controllers
//!
//! One controller per employee screen.
//!
//! ## Controller Organization
//! ```text
//! controllers/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── bills.rs     ◄─── Bill list: fetch, order, preview, new-bill button
//! └── new_bill.rs  ◄─── New bill form: file check, upload, update
//! ```
//!
//! ## Wiring
//! ```rust,ignore
//! let registry = EventRegistry::new();
//! let list = Arc::new(BillListController::new(store.clone(), nav.clone(), view.clone(), session.clone(), &config));
//! list.register(&registry);
//!
//! registry.dispatch(ViewEvent::NewBillClick).await;   // → navigate(NewBill)
//! ```

pub mod bills;
pub mod new_bill;

pub use bills::BillListController;
pub use new_bill::{NewBillController, SubmissionState, SubmitOutcome};
