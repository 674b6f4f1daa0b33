//! # New Bill Form
//!
//! The fields of the new-bill form as the view layer hands them over (raw
//! strings keyed by their test identifiers), and the rules that turn them
//! into a draft [`Bill`].
//!
//! ## Field Rules
//! ```text
//! ┌──────────────┬────────────────────────────────────────────────────────┐
//! │ test id      │ rule                                                   │
//! ├──────────────┼────────────────────────────────────────────────────────┤
//! │ expense-type │ one of the fixed categories, else NotAllowed           │
//! │ expense-name │ free text                                              │
//! │ datepicker   │ ISO YYYY-MM-DD, else Required / InvalidFormat          │
//! │ amount       │ leading integer; missing/invalid/negative → 0          │
//! │ vat          │ kept when numeric, else ""                             │
//! │ pct          │ leading integer in 0..=100, not 0; else default (20)   │
//! │ commentary   │ free text                                              │
//! │ file         │ handled by the controller, see SelectedFile            │
//! └──────────────┴────────────────────────────────────────────────────────┘
//! ```

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::{Bill, BillStatus, CurrentUser};
use crate::validation::{validate_expense_type, validate_iso_date, validate_pct, ValidationResult};

/// Test identifiers of the form surface, in display order.
pub const FORM_TEST_IDS: [&str; 8] = [
    "expense-type",
    "expense-name",
    "datepicker",
    "amount",
    "vat",
    "pct",
    "commentary",
    "file",
];

// =============================================================================
// Selected File
// =============================================================================

/// A file picked in the form's `file` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Name as shown by the file picker.
    pub name: String,

    /// Declared media type (`File.type` on the view side).
    pub content_type: String,

    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        SelectedFile {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

// =============================================================================
// Form Values
// =============================================================================

/// Raw values of the new-bill form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBillForm {
    #[serde(rename = "expense-type", default)]
    pub expense_type: String,

    #[serde(rename = "expense-name", default)]
    pub name: String,

    #[serde(rename = "datepicker", default)]
    pub date: String,

    #[serde(default)]
    pub amount: String,

    #[serde(default)]
    pub vat: String,

    #[serde(default)]
    pub pct: String,

    #[serde(default)]
    pub commentary: String,
}

impl NewBillForm {
    /// Reads a field by its test identifier.
    pub fn field(&self, test_id: &str) -> Option<&str> {
        let value = match test_id {
            "expense-type" => &self.expense_type,
            "expense-name" => &self.name,
            "datepicker" => &self.date,
            "amount" => &self.amount,
            "vat" => &self.vat,
            "pct" => &self.pct,
            "commentary" => &self.commentary,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Writes a field by its test identifier. Returns false for unknown ids.
    pub fn set_field(&mut self, test_id: &str, value: impl Into<String>) -> bool {
        let slot = match test_id {
            "expense-type" => &mut self.expense_type,
            "expense-name" => &mut self.name,
            "datepicker" => &mut self.date,
            "amount" => &mut self.amount,
            "vat" => &mut self.vat,
            "pct" => &mut self.pct,
            "commentary" => &mut self.commentary,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// Amount as a non-negative integer, 0 when unusable.
    pub fn amount(&self) -> u64 {
        match parse_leading_int(&self.amount) {
            Some(n) if n >= 0 => n as u64,
            _ => 0,
        }
    }

    /// VAT as typed when it is numeric, otherwise empty.
    pub fn vat(&self) -> String {
        let vat = self.vat.trim();
        if !vat.is_empty() && vat.parse::<f64>().is_ok() {
            vat.to_string()
        } else {
            String::new()
        }
    }

    /// VAT percentage, `default_pct` when missing, zero, invalid or out of range.
    pub fn pct(&self, default_pct: u32) -> u32 {
        parse_leading_int(&self.pct)
            .filter(|n| *n != 0)
            .and_then(|n| validate_pct(n).ok())
            .unwrap_or(default_pct)
    }

    /// Builds the draft bill for `user`.
    ///
    /// The draft has no id, no proof, and `status = pending`.
    ///
    /// ## Errors
    /// - `expense-type` outside the fixed set
    /// - `datepicker` missing or not ISO
    pub fn to_draft(&self, user: &CurrentUser, default_pct: u32) -> ValidationResult<Bill> {
        let expense_type = validate_expense_type("expense-type", &self.expense_type)?;
        let date = validate_iso_date("datepicker", &self.date)?;

        Ok(Bill {
            id: None,
            email: user.email_or_empty().to_string(),
            expense_type,
            name: self.name.trim().to_string(),
            amount: self.amount(),
            date,
            vat: self.vat(),
            pct: self.pct(default_pct),
            commentary: self.commentary.clone(),
            file_url: None,
            file_name: None,
            status: BillStatus::Pending,
            comment_admin: None,
        })
    }
}

/// Parses the leading integer of `s`, the way form inputs are read.
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit. `"12.5"` → 12, `"  -3px"` → -3, `"abc"` → None.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpenseType;
    use crate::DEFAULT_PCT;
    use chrono::NaiveDate;

    fn filled_form() -> NewBillForm {
        NewBillForm {
            expense_type: "Transports".to_string(),
            name: "Vol Paris Londres".to_string(),
            date: "2004-04-04".to_string(),
            amount: "348".to_string(),
            vat: "70".to_string(),
            pct: "20".to_string(),
            commentary: String::new(),
        }
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("12.5"), Some(12));
        assert_eq!(parse_leading_int("  -3px"), Some(-3));
        assert_eq!(parse_leading_int("+7"), Some(7));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn test_amount_fallback() {
        let mut form = filled_form();
        assert_eq!(form.amount(), 348);

        form.amount = "abc".to_string();
        assert_eq!(form.amount(), 0);

        form.amount = "-10".to_string();
        assert_eq!(form.amount(), 0);
    }

    #[test]
    fn test_pct_fallback() {
        let mut form = filled_form();
        form.pct = "10".to_string();
        assert_eq!(form.pct(DEFAULT_PCT), 10);

        for bad in ["", "abc", "0", "150", "-5"] {
            form.pct = bad.to_string();
            assert_eq!(form.pct(DEFAULT_PCT), 20, "pct {bad:?}");
        }
    }

    #[test]
    fn test_vat_numeric_or_empty() {
        let mut form = filled_form();
        assert_eq!(form.vat(), "70");

        form.vat = "n/a".to_string();
        assert_eq!(form.vat(), "");

        form.vat = "  ".to_string();
        assert_eq!(form.vat(), "");
    }

    #[test]
    fn test_field_access_by_test_id() {
        let mut form = NewBillForm::default();
        assert!(form.set_field("datepicker", "2001-01-01"));
        assert!(form.set_field("expense-name", "test1"));
        assert!(!form.set_field("file", "x"));

        assert_eq!(form.field("datepicker"), Some("2001-01-01"));
        assert_eq!(form.field("expense-name"), Some("test1"));
        assert_eq!(form.field("unknown"), None);
    }

    #[test]
    fn test_to_draft() {
        let user = CurrentUser::employee("a@a");
        let bill = filled_form().to_draft(&user, DEFAULT_PCT).unwrap();

        assert!(bill.is_draft());
        assert!(!bill.has_proof());
        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.email, "a@a");
        assert_eq!(bill.expense_type, ExpenseType::Transports);
        assert_eq!(bill.date, NaiveDate::from_ymd_opt(2004, 4, 4).unwrap());
        assert_eq!(bill.amount, 348);
        assert_eq!(bill.pct, 20);
    }

    #[test]
    fn test_to_draft_rejects_bad_date_and_type() {
        let user = CurrentUser::employee("a@a");

        let mut form = filled_form();
        form.date = String::new();
        assert!(form.to_draft(&user, DEFAULT_PCT).is_err());

        let mut form = filled_form();
        form.expense_type = "Voyage".to_string();
        assert!(form.to_draft(&user, DEFAULT_PCT).is_err());
    }

    #[test]
    fn test_form_deserializes_from_test_ids() {
        let form: NewBillForm = serde_json::from_str(
            r#"{"expense-type":"Transports","expense-name":"taxi","datepicker":"2002-02-02","amount":"12"}"#,
        )
        .unwrap();
        assert_eq!(form.name, "taxi");
        assert_eq!(form.date, "2002-02-02");
        assert_eq!(form.pct, "");
    }
}
