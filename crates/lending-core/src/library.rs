//! Library session: a ledger bound to a store and a clock.
//!
//! Every successful mutation is saved immediately. A failed save does not
//! undo the in-memory change; it is handed back as a warning in
//! [`Applied::save_error`] so the caller can report it separately from
//! logic errors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::clock::{Clock, SystemClock};
use crate::error::{LedgerError, Result};
use crate::ledger::{IntegrityIssue, Ledger, ReturnReceipt, SearchField, Statistics};
use crate::model::{Borrower, Item, Loan, LoanPolicy};
use crate::storage::{LedgerDocument, LedgerStore};

/// A mutation that was applied in memory, plus the outcome of saving it.
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    /// Set when the change could not be persisted
    pub save_error: Option<LedgerError>,
}

impl<T> Applied<T> {
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Applied<U> {
        Applied {
            value: f(self.value),
            save_error: self.save_error,
        }
    }
}

/// How a session came to hold its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// An existing document was loaded
    Loaded,
    /// Nothing was stored; a default ledger was created
    Created,
}

/// A ledger session with load-on-open and save-after-mutation semantics.
pub struct Library<S, C = SystemClock> {
    ledger: Ledger,
    store: S,
    clock: C,
    open_mode: OpenMode,
}

impl<S: LedgerStore> Library<S, SystemClock> {
    /// Open a session on `store` using wall-clock time.
    ///
    /// # Errors
    ///
    /// See [`Library::open_with_clock`].
    pub fn open(store: S) -> Result<Applied<Self>> {
        Self::open_with_clock(store, SystemClock)
    }
}

impl<S: LedgerStore, C: Clock> Library<S, C> {
    /// Open a session on `store` with an explicit clock.
    ///
    /// If the store holds nothing yet, a ledger with the default policy is
    /// created and saved right away; a failure of that first save is
    /// returned as a warning.
    ///
    /// # Errors
    ///
    /// Returns the store's error if an existing document cannot be read or
    /// decoded.
    pub fn open_with_clock(store: S, clock: C) -> Result<Applied<Self>> {
        match store.load()? {
            Some(document) => {
                let ledger = document.into_ledger()?;
                tracing::info!(
                    location = %store.location(),
                    items = ledger.items().count(),
                    borrowers = ledger.borrowers().count(),
                    "loaded ledger"
                );
                if ledger.needs_repair() {
                    tracing::warn!(location = %store.location(), "ledger needs manual repair");
                }
                Ok(Applied {
                    value: Self {
                        ledger,
                        store,
                        clock,
                        open_mode: OpenMode::Loaded,
                    },
                    save_error: None,
                })
            }
            None => {
                tracing::info!(location = %store.location(), "no ledger found, creating default");
                let library = Self {
                    ledger: Ledger::new(LoanPolicy::default()),
                    store,
                    clock,
                    open_mode: OpenMode::Created,
                };
                let save_error = library.persist();
                Ok(Applied {
                    value: library,
                    save_error,
                })
            }
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn open_mode(&self) -> OpenMode {
        self.open_mode
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Save the current ledger, returning the error instead of failing.
    fn persist(&self) -> Option<LedgerError> {
        let document = LedgerDocument::from(&self.ledger);
        match self.store.save(&document) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(location = %self.store.location(), error = %err, "save failed");
                Some(err)
            }
        }
    }

    fn commit<T>(&self, value: T) -> Applied<T> {
        Applied {
            value,
            save_error: self.persist(),
        }
    }

    // --- Mutations ---

    /// Add an item to the catalog.
    ///
    /// # Errors
    ///
    /// See [`Ledger::add_item`].
    pub fn add_item(&mut self, item: Item) -> Result<Applied<()>> {
        let id = item.id.clone();
        self.ledger.add_item(item)?;
        tracing::info!(item = %id, "item added");
        Ok(self.commit(()))
    }

    /// Remove an available item from the catalog.
    ///
    /// # Errors
    ///
    /// See [`Ledger::remove_item`].
    pub fn remove_item(&mut self, id: &str) -> Result<Applied<Item>> {
        let removed = self.ledger.remove_item(id)?;
        tracing::info!(item = %id, "item removed");
        Ok(self.commit(removed))
    }

    /// Register a borrower.
    ///
    /// # Errors
    ///
    /// See [`Ledger::add_borrower`].
    pub fn add_borrower(&mut self, borrower: Borrower) -> Result<Applied<()>> {
        let id = borrower.id.clone();
        self.ledger.add_borrower(borrower)?;
        tracing::info!(borrower = %id, "borrower added");
        Ok(self.commit(()))
    }

    /// Check an item out to a borrower now.
    ///
    /// # Errors
    ///
    /// See [`Ledger::checkout`].
    pub fn checkout(&mut self, item_id: &str, borrower_id: &str) -> Result<Applied<Loan>> {
        let now = self.clock.now();
        let loan = self.ledger.checkout(item_id, borrower_id, now)?;
        tracing::info!(item = %item_id, borrower = %borrower_id, "item checked out");
        Ok(self.commit(loan))
    }

    /// Return an item now.
    ///
    /// # Errors
    ///
    /// See [`Ledger::return_item`].
    pub fn return_item(&mut self, item_id: &str) -> Result<Applied<ReturnReceipt>> {
        let now = self.clock.now();
        let receipt = self.ledger.return_item(item_id, now)?;
        tracing::info!(
            item = %item_id,
            borrower = %receipt.borrower_id,
            late_days = receipt.late_days,
            "item returned"
        );
        Ok(self.commit(receipt))
    }

    /// Change the loan duration for future checkouts.
    ///
    /// # Errors
    ///
    /// See [`Ledger::set_loan_duration`].
    pub fn set_loan_duration(&mut self, days: i64) -> Result<Applied<()>> {
        self.ledger.set_loan_duration(days)?;
        tracing::info!(days, "loan duration updated");
        Ok(self.commit(()))
    }

    /// Change the per-day late fee.
    ///
    /// # Errors
    ///
    /// See [`Ledger::set_penalty_rate`].
    pub fn set_penalty_rate(&mut self, rate: Decimal) -> Result<Applied<()>> {
        self.ledger.set_penalty_rate(rate)?;
        tracing::info!(%rate, "penalty rate updated");
        Ok(self.commit(()))
    }

    // --- Queries ---

    pub fn search(&self, field: SearchField, text: &str) -> Vec<&Item> {
        self.ledger.search(field, text)
    }

    pub fn available_items(&self) -> Vec<&Item> {
        self.ledger.available_items()
    }

    /// Items overdue as of the session clock.
    pub fn overdue_items(&self) -> Vec<&Item> {
        self.ledger.overdue_items(self.clock.now())
    }

    pub fn statistics(&self) -> Statistics {
        self.ledger.statistics()
    }

    pub fn integrity_report(&self) -> Vec<IntegrityIssue> {
        self.ledger.integrity_report()
    }
}
