//! # Display Formatting
//!
//! Turns store records into what the bill list shows: a localized short
//! date, a status label, and anti-chronological order.
//!
//! ## Per-Record Degradation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  records from store.list()                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  order_anti_chronologically()   (raw ISO dates, newest first)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BillListItem::from_record() per record                                │
//! │       ├── date   ok? ──► FieldDisplay::Formatted("4 Avr. 04")          │
//! │       │          err? ─► FieldDisplay::Raw("not-a-date")               │
//! │       └── status ok? ──► FieldDisplay::Formatted("En attente")         │
//! │                  err? ─► FieldDisplay::Raw("archived")                 │
//! │                                                                         │
//! │  A malformed field degrades that field only, never the list.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{BillRecord, BillStatus};

// =============================================================================
// Locale
// =============================================================================

/// Language of the display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    /// Three-letter month abbreviations, January first.
    fn months(&self) -> [&'static str; 12] {
        match self {
            Locale::Fr => [
                "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
            ],
            Locale::En => [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ],
        }
    }

    fn status_label(&self, status: BillStatus) -> &'static str {
        match (self, status) {
            (Locale::Fr, BillStatus::Pending) => "En attente",
            (Locale::Fr, BillStatus::Accepted) => "Accepté",
            (Locale::Fr, BillStatus::Refused) => "Refusé",
            (Locale::En, BillStatus::Pending) => "Pending",
            (Locale::En, BillStatus::Accepted) => "Accepted",
            (Locale::En, BillStatus::Refused) => "Refused",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Fr => write!(f, "fr"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fr" | "fr-fr" => Ok(Locale::Fr),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(CoreError::UnknownLocale(other.to_string())),
        }
    }
}

// =============================================================================
// Formatting Functions
// =============================================================================

/// Formats an ISO date as `"{day} {Mon}. {yy}"`.
///
/// ## Example
/// ```rust
/// use billed_core::format::{format_date, Locale};
///
/// assert_eq!(format_date("2004-04-04", Locale::Fr).unwrap(), "4 Avr. 04");
/// assert_eq!(format_date("2001-12-25", Locale::En).unwrap(), "25 Dec. 01");
/// assert!(format_date("yesterday", Locale::Fr).is_err());
/// ```
pub fn format_date(iso: &str, locale: Locale) -> CoreResult<String> {
    let date = parse_iso_date(iso)?;
    let month = locale.months()[date.month0() as usize];
    Ok(format!(
        "{} {}. {:02}",
        date.day(),
        month,
        date.year().rem_euclid(100)
    ))
}

/// Maps a wire status to its display label.
pub fn format_status(status: &str, locale: Locale) -> CoreResult<String> {
    let status: BillStatus = status.parse()?;
    Ok(locale.status_label(status).to_string())
}

fn parse_iso_date(iso: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d").map_err(|e| CoreError::InvalidDate {
        value: iso.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// Field Display
// =============================================================================

/// A display field that either formatted or fell back to its raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldDisplay {
    Formatted(String),
    Raw(String),
}

impl FieldDisplay {
    /// Wraps a formatting result, keeping `raw` when formatting failed.
    pub fn from_result(result: CoreResult<String>, raw: Option<&str>) -> Self {
        match result {
            Ok(value) => FieldDisplay::Formatted(value),
            Err(_) => FieldDisplay::Raw(raw.unwrap_or_default().to_string()),
        }
    }

    /// The text to render.
    pub fn as_str(&self) -> &str {
        match self {
            FieldDisplay::Formatted(v) | FieldDisplay::Raw(v) => v,
        }
    }

    /// True when formatting failed and the raw value is shown.
    pub fn is_degraded(&self) -> bool {
        matches!(self, FieldDisplay::Raw(_))
    }
}

impl fmt::Display for FieldDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Bill List Item
// =============================================================================

/// One row of the bill list: the record plus its display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillListItem {
    pub bill: BillRecord,
    pub date: FieldDisplay,
    pub status: FieldDisplay,
}

impl BillListItem {
    /// Formats one record. Never fails; see [`FieldDisplay`].
    pub fn from_record(bill: BillRecord, locale: Locale) -> Self {
        let date = FieldDisplay::from_result(
            bill.date
                .as_deref()
                .ok_or_else(|| CoreError::MissingField("date".to_string()))
                .and_then(|d| format_date(d, locale)),
            bill.date.as_deref(),
        );
        let status = FieldDisplay::from_result(
            bill.status
                .as_deref()
                .ok_or_else(|| CoreError::MissingField("status".to_string()))
                .and_then(|s| format_status(s, locale)),
            bill.status.as_deref(),
        );

        BillListItem { bill, date, status }
    }

    pub fn id(&self) -> &str {
        &self.bill.id
    }

    /// URL handed to the preview modal by the eye icon.
    pub fn file_url(&self) -> Option<&str> {
        self.bill.file_url.as_deref()
    }

    /// True when either display field fell back to its raw value.
    pub fn is_degraded(&self) -> bool {
        self.date.is_degraded() || self.status.is_degraded()
    }
}

// =============================================================================
// Ordering
// =============================================================================

/// Sorts records newest first by their raw ISO date.
///
/// The sort is stable: equal dates keep fetch order, and records whose date
/// is missing or unparsable keep fetch order after every dated record.
pub fn order_anti_chronologically(records: &mut [BillRecord]) {
    records.sort_by_key(|r| Reverse(r.date.as_deref().and_then(|d| parse_iso_date(d).ok())));
}

// =============================================================================
// Unit Tests
// =============================================================================
