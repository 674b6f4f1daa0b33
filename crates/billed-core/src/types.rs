//! # Domain Types
//!
//! Core domain types used throughout Billed.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Bill       │   │   BillRecord    │   │   CurrentUser   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  typed, what    │   │  as listed by   │   │  type, email    │       │
//! │  │  the client     │   │  the store,     │   │  (session blob) │       │
//! │  │  submits        │   │  every field    │   │                 │       │
//! │  │                 │   │  tolerated      │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   BillStatus    │   │   ExpenseType   │   │    UserType     │       │
//! │  │  pending        │   │  7 fixed        │   │  Employee       │       │
//! │  │  accepted       │   │  categories     │   │  Admin          │       │
//! │  │  refused        │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Bill Lifecycle
//! A `Bill` starts as a draft on the client (`id = None`, `status = Pending`,
//! no proof). The proof upload fills `file_url`/`file_name` together, then the
//! metadata update persists it. Status changes after that belong to the
//! admin side and never pass through this crate.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Bill Status
// =============================================================================

/// Review status of a bill. The client only ever creates `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// Submitted, waiting for review.
    #[default]
    Pending,
    /// Approved by an admin.
    Accepted,
    /// Rejected by an admin.
    Refused,
}

impl BillStatus {
    /// Wire value as stored in records.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(BillStatus::Pending),
            "accepted" => Ok(BillStatus::Accepted),
            "refused" => Ok(BillStatus::Refused),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

// =============================================================================
// Expense Type
// =============================================================================

/// Expense category of a bill, one of a fixed set.
///
/// Serialized with the labels the view layer shows in its `<select>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ExpenseType {
    #[serde(rename = "Transports")]
    Transports,
    #[serde(rename = "Restaurants et bars")]
    RestaurantsAndBars,
    #[serde(rename = "Hôtel et logement")]
    HotelAndLodging,
    #[serde(rename = "Services en ligne")]
    OnlineServices,
    #[serde(rename = "IT et électronique")]
    ItAndElectronics,
    #[serde(rename = "Equipement et matériel")]
    EquipmentAndHardware,
    #[serde(rename = "Fournitures de bureau")]
    OfficeSupplies,
}

impl ExpenseType {
    /// Every category, in the order the form lists them.
    pub const ALL: [ExpenseType; 7] = [
        ExpenseType::Transports,
        ExpenseType::RestaurantsAndBars,
        ExpenseType::HotelAndLodging,
        ExpenseType::OnlineServices,
        ExpenseType::ItAndElectronics,
        ExpenseType::EquipmentAndHardware,
        ExpenseType::OfficeSupplies,
    ];

    /// Label used on the wire and in the form.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Transports => "Transports",
            ExpenseType::RestaurantsAndBars => "Restaurants et bars",
            ExpenseType::HotelAndLodging => "Hôtel et logement",
            ExpenseType::OnlineServices => "Services en ligne",
            ExpenseType::ItAndElectronics => "IT et électronique",
            ExpenseType::EquipmentAndHardware => "Equipement et matériel",
            ExpenseType::OfficeSupplies => "Fournitures de bureau",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpenseType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ExpenseType::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or_else(|| CoreError::UnknownExpenseType(s.to_string()))
    }
}

// =============================================================================
// Bill
// =============================================================================

/// One expense claim, as the client builds and submits it.
///
/// ## Invariants
/// - `file_url` and `file_name` are either both set or both `None`
///   (use [`Bill::with_proof`])
/// - `amount` and `pct` always hold a number; parsing fallbacks live in
///   [`crate::form`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Store-assigned identifier, `None` while the bill is a draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owner identity.
    pub email: String,

    #[serde(rename = "type")]
    pub expense_type: ExpenseType,

    /// Free-text label.
    pub name: String,

    /// Non-negative amount, currency-agnostic.
    #[ts(type = "number")]
    pub amount: u64,

    #[ts(as = "String")]
    pub date: NaiveDate,

    /// VAT amount as typed; empty when not given.
    #[serde(default)]
    pub vat: String,

    /// VAT percentage.
    pub pct: u32,

    #[serde(default)]
    pub commentary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    pub status: BillStatus,

    /// Reviewer note, set on the admin side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_admin: Option<String>,
}

impl Bill {
    /// Returns a copy with the uploaded proof attached.
    pub fn with_proof(mut self, file_url: impl Into<String>, file_name: impl Into<String>) -> Self {
        self.file_url = Some(file_url.into());
        self.file_name = Some(file_name.into());
        self
    }

    /// True until the store has assigned an id.
    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// True once the proof upload has completed.
    pub fn has_proof(&self) -> bool {
        self.file_url.is_some() && self.file_name.is_some()
    }
}

// =============================================================================
// Bill Record
// =============================================================================

/// A bill as listed by the store.
///
/// Every field except `id` is optional, and decoding never fails on a
/// field's shape: text fields keep the raw JSON of a non-string value and
/// numeric fields drop anything that is not a non-negative integer. One
/// malformed record therefore never prevents the list from being read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    pub id: String,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub expense_type: Option<String>,
    pub name: Option<String>,
    #[ts(type = "number | null")]
    pub amount: Option<u64>,
    pub date: Option<String>,
    pub vat: Option<String>,
    pub pct: Option<u32>,
    pub commentary: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: Option<String>,
    pub comment_admin: Option<String>,
}

/// Shape-agnostic view of a store record, decoded before [`BillRecord`].
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawBillRecord {
    id: Option<Value>,
    email: Option<Value>,
    #[serde(rename = "type")]
    expense_type: Option<Value>,
    name: Option<Value>,
    amount: Option<Value>,
    date: Option<Value>,
    vat: Option<Value>,
    pct: Option<Value>,
    commentary: Option<Value>,
    file_url: Option<Value>,
    file_name: Option<Value>,
    status: Option<Value>,
    comment_admin: Option<Value>,
}

/// Strings pass through; any other non-null value keeps its JSON text.
fn lenient_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Non-negative integers, also when sent as a string; `None` otherwise.
fn lenient_int<T: TryFrom<u64>>(value: Option<Value>) -> Option<T> {
    let n = match value? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    T::try_from(n).ok()
}

impl<'de> Deserialize<'de> for BillRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawBillRecord::deserialize(deserializer)?;
        Ok(BillRecord {
            id: lenient_text(raw.id).unwrap_or_default(),
            email: lenient_text(raw.email),
            expense_type: lenient_text(raw.expense_type),
            name: lenient_text(raw.name),
            amount: lenient_int(raw.amount),
            date: lenient_text(raw.date),
            vat: lenient_text(raw.vat),
            pct: lenient_int(raw.pct),
            commentary: lenient_text(raw.commentary),
            file_url: lenient_text(raw.file_url),
            file_name: lenient_text(raw.file_name),
            status: lenient_text(raw.status),
            comment_admin: lenient_text(raw.comment_admin),
        })
    }
}

impl From<&Bill> for BillRecord {
    fn from(bill: &Bill) -> Self {
        BillRecord {
            id: bill.id.clone().unwrap_or_default(),
            email: Some(bill.email.clone()),
            expense_type: Some(bill.expense_type.label().to_string()),
            name: Some(bill.name.clone()),
            amount: Some(bill.amount),
            date: Some(bill.date.format("%Y-%m-%d").to_string()),
            vat: Some(bill.vat.clone()),
            pct: Some(bill.pct),
            commentary: Some(bill.commentary.clone()),
            file_url: bill.file_url.clone(),
            file_name: bill.file_name.clone(),
            status: Some(bill.status.as_str().to_string()),
            comment_admin: bill.comment_admin.clone(),
        }
    }
}

// =============================================================================
// Session User
// =============================================================================

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum UserType {
    Employee,
    Admin,
}

/// Identity of the signed-in user, as kept in the session blob under `"user"`.
///
/// ```json
/// { "type": "Employee", "email": "a@a" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrentUser {
    #[serde(rename = "type")]
    pub user_type: UserType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CurrentUser {
    /// Creates an employee identity.
    pub fn employee(email: impl Into<String>) -> Self {
        CurrentUser {
            user_type: UserType::Employee,
            email: Some(email.into()),
        }
    }

    /// Email to stamp on submitted bills; empty when the session has none.
    pub fn email_or_empty(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
