//! The in-memory ledger: item and borrower registries plus loan policy.
//!
//! All mutating operations either apply completely or leave the ledger
//! untouched. A consistency violation additionally marks the ledger as
//! needing repair, after which mutations are refused until the document is
//! fixed and reloaded.

mod integrity;
mod query;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::model::{Borrower, Item, Loan, LoanPolicy};

pub use integrity::IntegrityIssue;
pub use query::{SearchField, Statistics, TopBorrower, TopItem};

/// Outcome of a successful return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub item_id: String,
    pub borrower_id: String,
    /// Whole days past due (0 when on time)
    pub late_days: i64,
    /// Amount added to the borrower's penalty balance
    pub penalty: Decimal,
}

/// Aggregate root owning every item, borrower and the loan policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    items: BTreeMap<String, Item>,
    borrowers: BTreeMap<String, Borrower>,
    policy: LoanPolicy,
    needs_repair: bool,
    /// Problems found while decoding stored records
    load_issues: Vec<IntegrityIssue>,
}

impl Ledger {
    /// Create an empty ledger with the given policy.
    pub fn new(policy: LoanPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Rebuild a ledger from previously persisted parts.
    ///
    /// The parts are accepted as-is; if they violate any ledger invariant
    /// the ledger is flagged as needing repair.
    pub fn from_parts(
        items: impl IntoIterator<Item = Item>,
        borrowers: impl IntoIterator<Item = Borrower>,
        policy: LoanPolicy,
    ) -> Self {
        Self::from_loaded(items, borrowers, policy, Vec::new())
    }

    /// Like [`Ledger::from_parts`], carrying problems the decoder already
    /// found in records it had to patch up.
    pub(crate) fn from_loaded(
        items: impl IntoIterator<Item = Item>,
        borrowers: impl IntoIterator<Item = Borrower>,
        policy: LoanPolicy,
        load_issues: Vec<IntegrityIssue>,
    ) -> Self {
        let mut ledger = Self {
            items: items
                .into_iter()
                .map(|item| (item.id.clone(), item))
                .collect(),
            borrowers: borrowers
                .into_iter()
                .map(|borrower| (borrower.id.clone(), borrower))
                .collect(),
            policy,
            needs_repair: false,
            load_issues,
        };
        let violations = ledger.integrity_report();
        if !violations.is_empty() {
            for violation in &violations {
                tracing::error!(%violation, "ledger invariant violated");
            }
            ledger.needs_repair = true;
        }
        ledger
    }

    pub fn policy(&self) -> LoanPolicy {
        self.policy
    }

    /// Whether a consistency violation has been detected.
    pub fn needs_repair(&self) -> bool {
        self.needs_repair
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn borrower(&self, id: &str) -> Option<&Borrower> {
        self.borrowers.get(id)
    }

    /// All items in registry order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// All borrowers in registry order.
    pub fn borrowers(&self) -> impl Iterator<Item = &Borrower> {
        self.borrowers.values()
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.needs_repair {
            return Err(LedgerError::Consistency(
                "ledger needs manual repair before it can be modified".to_string(),
            ));
        }
        Ok(())
    }

    fn consistency_failure(&mut self, message: String) -> LedgerError {
        tracing::error!(%message, "ledger flagged for repair");
        self.needs_repair = true;
        LedgerError::Consistency(message)
    }

    // --- Registry operations ---

    /// Add an item to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateKey` if the catalog number is taken.
    pub fn add_item(&mut self, item: Item) -> Result<()> {
        self.ensure_writable()?;
        if self.items.contains_key(&item.id) {
            return Err(LedgerError::DuplicateKey(format!(
                "item \"{}\" already exists",
                item.id
            )));
        }
        tracing::debug!(item = %item.id, "adding item");
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Remove an item from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the item is unknown and
    /// `LedgerError::Conflict` if it is checked out.
    pub fn remove_item(&mut self, id: &str) -> Result<Item> {
        self.ensure_writable()?;
        let item = self
            .items
            .get(id)
            .ok_or_else(|| LedgerError::NotFound(format!("item \"{}\"", id)))?;
        if let Some(holder) = item.holder() {
            return Err(LedgerError::Conflict(format!(
                "item \"{}\" is checked out by \"{}\"",
                id, holder
            )));
        }
        tracing::debug!(item = %id, "removing item");
        self.items
            .remove(id)
            .ok_or_else(|| LedgerError::NotFound(format!("item \"{}\"", id)))
    }

    /// Register a borrower.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateKey` if the identifier is taken.
    pub fn add_borrower(&mut self, borrower: Borrower) -> Result<()> {
        self.ensure_writable()?;
        if self.borrowers.contains_key(&borrower.id) {
            return Err(LedgerError::DuplicateKey(format!(
                "borrower \"{}\" already exists",
                borrower.id
            )));
        }
        tracing::debug!(borrower = %borrower.id, "adding borrower");
        self.borrowers.insert(borrower.id.clone(), borrower);
        Ok(())
    }

    // --- Loans ---

    /// Check an item out to a borrower at `now`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if either identifier is unknown,
    /// `LedgerError::Unavailable` if the item is already on loan and
    /// `LedgerError::InvalidArgument` if the due date cannot be represented.
    pub fn checkout(&mut self, item_id: &str, borrower_id: &str, now: DateTime<Utc>) -> Result<Loan> {
        self.ensure_writable()?;
        let item = self
            .items
            .get_mut(item_id)
            .ok_or_else(|| LedgerError::NotFound(format!("item \"{}\"", item_id)))?;
        let borrower = self
            .borrowers
            .get_mut(borrower_id)
            .ok_or_else(|| LedgerError::NotFound(format!("borrower \"{}\"", borrower_id)))?;
        if let Some(holder) = item.holder() {
            return Err(LedgerError::Unavailable(format!(
                "item \"{}\" is already checked out by \"{}\"",
                item_id, holder
            )));
        }

        let loan = Loan {
            holder: borrower_id.to_string(),
            checked_out_at: now,
            due_at: self.policy.due_date(now)?,
        };
        item.loan = Some(loan.clone());
        item.checkout_count += 1;
        borrower.holding.insert(item_id.to_string());
        borrower.history.push(item_id.to_string());

        tracing::debug!(item = %item_id, borrower = %borrower_id, due = %loan.due_at, "checked out");
        Ok(loan)
    }

    /// Return an item at `now`, charging the holder for any late days.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the item is unknown or not on loan,
    /// `LedgerError::Consistency` if the recorded holder does not exist and
    /// `LedgerError::InvalidArgument` if the late fee overflows.
    pub fn return_item(&mut self, item_id: &str, now: DateTime<Utc>) -> Result<ReturnReceipt> {
        self.ensure_writable()?;
        let loan = match self.items.get(item_id).and_then(|item| item.loan.clone()) {
            Some(loan) => loan,
            None => {
                return Err(LedgerError::NotFound(format!(
                    "item \"{}\" is not checked out",
                    item_id
                )))
            }
        };
        if !self.borrowers.contains_key(&loan.holder) {
            return Err(self.consistency_failure(format!(
                "item \"{}\" is held by unknown borrower \"{}\"",
                item_id, loan.holder
            )));
        }

        let late_days = loan.late_days(now);
        let penalty = self.policy.penalty_for(&loan, now)?;
        let balance = self
            .borrowers
            .get(&loan.holder)
            .and_then(|borrower| borrower.penalties.checked_add(penalty))
            .ok_or_else(|| {
                LedgerError::InvalidArgument(format!(
                    "penalty balance of \"{}\" would overflow",
                    loan.holder
                ))
            })?;

        if let Some(borrower) = self.borrowers.get_mut(&loan.holder) {
            borrower.penalties = balance;
            borrower.holding.remove(item_id);
        }
        if let Some(item) = self.items.get_mut(item_id) {
            item.loan = None;
        }

        tracing::debug!(item = %item_id, borrower = %loan.holder, late_days, %penalty, "returned");
        Ok(ReturnReceipt {
            item_id: item_id.to_string(),
            borrower_id: loan.holder,
            late_days,
            penalty,
        })
    }

    // --- Configuration ---

    /// Change the loan duration for future checkouts.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidArgument` unless `days` is between 1 and
    /// [`crate::model::MAX_LOAN_DAYS`].
    pub fn set_loan_duration(&mut self, days: i64) -> Result<()> {
        self.ensure_writable()?;
        self.policy.loan_days = LoanPolicy::validate_loan_days(days)?;
        Ok(())
    }

    /// Change the per-day late fee for future returns.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidArgument` if `rate` is negative.
    pub fn set_penalty_rate(&mut self, rate: Decimal) -> Result<()> {
        self.ensure_writable()?;
        self.policy.penalty_rate = LoanPolicy::validate_penalty_rate(rate)?;
        Ok(())
    }
}
