//! Persisted document shape.
//!
//! The document keeps a flat record per item (availability flag plus
//! nullable holder and timestamps) so the file stays readable by hand.
//! Converting a record back into an [`Item`] checks that the flat fields
//! agree with each other; a record where they do not still loads, and the
//! disagreement is reported as an [`IntegrityIssue`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::ledger::{IntegrityIssue, Ledger};
use crate::model::{Borrower, Item, Loan, LoanPolicy};

/// Current document format version.
pub const FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

/// Serialized ledger state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    /// Document format version
    #[serde(default = "default_format_version")]
    pub format_version: u32,

    /// Items keyed by catalog number
    pub items: BTreeMap<String, ItemRecord>,

    /// Borrowers keyed by identifier
    pub borrowers: BTreeMap<String, BorrowerRecord>,

    /// Loan duration in days
    pub loan_days: u32,

    /// Late fee per day
    pub penalty_rate: Decimal,
}

/// Serialized item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub available: bool,
    pub holder: Option<String>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub checkout_count: u64,
}

/// Serialized borrower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerRecord {
    pub id: String,
    pub name: String,
    pub holding: BTreeSet<String>,
    pub history: Vec<String>,
    pub penalties: Decimal,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            author: item.author.clone(),
            available: item.is_available(),
            holder: item.loan.as_ref().map(|loan| loan.holder.clone()),
            checked_out_at: item.loan.as_ref().map(|loan| loan.checked_out_at),
            due_at: item.loan.as_ref().map(|loan| loan.due_at),
            checkout_count: item.checkout_count,
        }
    }
}

impl ItemRecord {
    /// Convert into an [`Item`], reporting a record whose availability flag
    /// contradicts its loan fields.
    ///
    /// A contradictory record keeps its loan when holder and both dates are
    /// present and is treated as on the shelf otherwise.
    pub fn into_item(self) -> (Item, Option<IntegrityIssue>) {
        let consistent = match (&self.holder, &self.checked_out_at, &self.due_at) {
            (None, None, None) => self.available,
            (Some(_), Some(_), Some(_)) => !self.available,
            _ => false,
        };
        let issue = (!consistent).then(|| IntegrityIssue::LoanStateMismatch {
            item: self.id.clone(),
        });
        let loan = match (self.holder, self.checked_out_at, self.due_at) {
            (Some(holder), Some(checked_out_at), Some(due_at)) => Some(Loan {
                holder,
                checked_out_at,
                due_at,
            }),
            _ => None,
        };
        let item = Item {
            id: self.id,
            title: self.title,
            author: self.author,
            loan,
            checkout_count: self.checkout_count,
        };
        (item, issue)
    }
}

impl From<&Borrower> for BorrowerRecord {
    fn from(borrower: &Borrower) -> Self {
        Self {
            id: borrower.id.clone(),
            name: borrower.name.clone(),
            holding: borrower.holding.clone(),
            history: borrower.history.clone(),
            penalties: borrower.penalties,
        }
    }
}

impl From<BorrowerRecord> for Borrower {
    fn from(record: BorrowerRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            holding: record.holding,
            history: record.history,
            penalties: record.penalties,
        }
    }
}

impl From<&Ledger> for LedgerDocument {
    fn from(ledger: &Ledger) -> Self {
        let policy = ledger.policy();
        Self {
            format_version: FORMAT_VERSION,
            items: ledger
                .items()
                .map(|item| (item.id.clone(), ItemRecord::from(item)))
                .collect(),
            borrowers: ledger
                .borrowers()
                .map(|borrower| (borrower.id.clone(), BorrowerRecord::from(borrower)))
                .collect(),
            loan_days: policy.loan_days,
            penalty_rate: policy.penalty_rate,
        }
    }
}

impl LedgerDocument {
    /// Rebuild the ledger described by this document.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Serialization` for an unsupported format
    /// version, an out-of-range policy or a record stored under the wrong
    /// key. Invariant violations do not fail the load; they flag the
    /// returned ledger as needing repair.
    pub fn into_ledger(self) -> Result<Ledger> {
        if self.format_version != FORMAT_VERSION {
            return Err(LedgerError::Serialization(format!(
                "unsupported format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        let policy = LoanPolicy {
            loan_days: LoanPolicy::validate_loan_days(i64::from(self.loan_days))
                .map_err(|e| LedgerError::Serialization(e.to_string()))?,
            penalty_rate: LoanPolicy::validate_penalty_rate(self.penalty_rate)
                .map_err(|e| LedgerError::Serialization(e.to_string()))?,
        };

        let mut items = Vec::with_capacity(self.items.len());
        let mut load_issues = Vec::new();
        for (key, record) in self.items {
            if key != record.id {
                return Err(LedgerError::Serialization(format!(
                    "item stored under \"{}\" has id \"{}\"",
                    key, record.id
                )));
            }
            let (item, issue) = record.into_item();
            load_issues.extend(issue);
            items.push(item);
        }

        let mut borrowers = Vec::with_capacity(self.borrowers.len());
        for (key, record) in self.borrowers {
            if key != record.id {
                return Err(LedgerError::Serialization(format!(
                    "borrower stored under \"{}\" has id \"{}\"",
                    key, record.id
                )));
            }
            borrowers.push(Borrower::from(record));
        }

        Ok(Ledger::from_loaded(items, borrowers, policy, load_issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record(available: bool, holder: Option<&str>, dated: bool) -> ItemRecord {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        ItemRecord {
            id: "i1".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            available,
            holder: holder.map(String::from),
            checked_out_at: dated.then_some(at),
            due_at: dated.then_some(at + Duration::days(14)),
            checkout_count: 1,
        }
    }

    #[test]
    fn test_available_record_converts() {
        let (item, issue) = record(true, None, false).into_item();
        assert!(item.is_available());
        assert!(issue.is_none());
    }

    #[test]
    fn test_loaned_record_converts() {
        let (item, issue) = record(false, Some("u1"), true).into_item();
        assert_eq!(item.holder(), Some("u1"));
        assert!(issue.is_none());
    }

    #[test]
    fn test_inconsistent_records_are_reported() {
        let mismatch = Some(IntegrityIssue::LoanStateMismatch {
            item: "i1".to_string(),
        });

        let (item, issue) = record(false, None, false).into_item();
        assert!(item.is_available());
        assert_eq!(issue, mismatch);

        let (item, issue) = record(true, Some("u1"), true).into_item();
        assert_eq!(item.holder(), Some("u1"));
        assert_eq!(issue, mismatch);

        let (item, issue) = record(false, Some("u1"), false).into_item();
        assert!(item.is_available());
        assert_eq!(issue, mismatch);
    }

    #[test]
    fn test_document_with_inconsistent_record_loads_flagged() {
        let mut document = LedgerDocument::from(&Ledger::default());
        document
            .items
            .insert("i1".to_string(), record(false, None, false));

        let ledger = document.into_ledger().unwrap();
        assert!(ledger.needs_repair());
        assert!(ledger.item("i1").is_some());
        assert_eq!(
            ledger.integrity_report(),
            vec![IntegrityIssue::LoanStateMismatch {
                item: "i1".to_string()
            }]
        );
    }

    #[test]
    fn test_high_precision_money_survives_json() {
        let mut document = LedgerDocument::from(&Ledger::default());
        let rate: Decimal = "0.123456789012345678".parse().unwrap();
        document.penalty_rate = rate;

        let json = serde_json::to_string(&document).unwrap();
        assert!(json.contains("\"penalty_rate\":0.123456789012345678"));
        let back: LedgerDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.penalty_rate, rate);
    }

    #[test]
    fn test_absent_timestamps_serialize_as_null() {
        let json = serde_json::to_value(record(true, None, false)).unwrap();
        assert!(json["holder"].is_null());
        assert!(json["checked_out_at"].is_null());
        assert!(json["due_at"].is_null());
    }

    #[test]
    fn test_document_rejects_mismatched_key() {
        let mut document = LedgerDocument::from(&Ledger::default());
        document
            .items
            .insert("other".to_string(), record(true, None, false));
        let err = document.into_ledger().unwrap_err();
        assert!(err.to_string().contains("other"));
    }

    #[test]
    fn test_document_rejects_zero_loan_days() {
        let mut document = LedgerDocument::from(&Ledger::default());
        document.loan_days = 0;
        assert!(document.into_ledger().is_err());
    }
}
