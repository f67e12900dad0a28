//! Catalog and borrower data types.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};

/// Default loan duration in days.
pub const DEFAULT_LOAN_DAYS: u32 = 14;

/// Longest loan duration accepted, in days (one hundred years).
pub const MAX_LOAN_DAYS: u32 = 36_500;

/// An active loan of one item.
///
/// An item is available exactly when it has no loan, so the holder and both
/// timestamps are always present together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    /// Borrower holding the item
    pub holder: String,

    /// When the item was checked out
    pub checked_out_at: DateTime<Utc>,

    /// When the item is due back
    pub due_at: DateTime<Utc>,
}

impl Loan {
    /// Whole days elapsed past the due date at `now`, truncated toward zero.
    ///
    /// Returns 0 when the item is returned on time or early.
    pub fn late_days(&self, now: DateTime<Utc>) -> i64 {
        if now > self.due_at {
            (now - self.due_at).num_days()
        } else {
            0
        }
    }

    /// Whether the due date is strictly before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_at < now
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Catalog number
    pub id: String,

    pub title: String,

    pub author: String,

    /// Current loan, absent while the item is on the shelf
    pub loan: Option<Loan>,

    /// Lifetime checkout counter; never reset
    pub checkout_count: u64,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            loan: None,
            checkout_count: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.loan.is_none()
    }

    /// Borrower currently holding the item, if any.
    pub fn holder(&self) -> Option<&str> {
        self.loan.as_ref().map(|loan| loan.holder.as_str())
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.loan.as_ref().map(|loan| loan.due_at)
    }
}

/// A registered borrower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borrower {
    pub id: String,

    /// Display name
    pub name: String,

    /// Items currently held
    pub holding: BTreeSet<String>,

    /// Every item ever checked out, in checkout order (append-only)
    pub history: Vec<String>,

    /// Accumulated late fees
    pub penalties: Decimal,
}

impl Borrower {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            holding: BTreeSet::new(),
            history: Vec::new(),
            penalties: Decimal::ZERO,
        }
    }
}

/// Loan duration and late-fee rate applied to new checkouts and returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    /// Loan duration in calendar days
    pub loan_days: u32,

    /// Currency charged per whole day late
    pub penalty_rate: Decimal,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_days: DEFAULT_LOAN_DAYS,
            // 0.50 per day
            penalty_rate: Decimal::new(5, 1),
        }
    }
}

impl LoanPolicy {
    /// Validate a loan duration.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidArgument` unless `days` is between 1 and
    /// [`MAX_LOAN_DAYS`].
    pub fn validate_loan_days(days: i64) -> Result<u32> {
        if days <= 0 {
            return Err(LedgerError::InvalidArgument(format!(
                "loan duration must be a positive number of days (got {})",
                days
            )));
        }
        match u32::try_from(days) {
            Ok(days) if days <= MAX_LOAN_DAYS => Ok(days),
            _ => Err(LedgerError::InvalidArgument(format!(
                "loan duration is too large: {} days (at most {})",
                days, MAX_LOAN_DAYS
            ))),
        }
    }

    /// Validate a penalty rate.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidArgument` if `rate` is negative.
    pub fn validate_penalty_rate(rate: Decimal) -> Result<Decimal> {
        if rate.is_sign_negative() && !rate.is_zero() {
            return Err(LedgerError::InvalidArgument(format!(
                "penalty rate cannot be negative (got {})",
                rate
            )));
        }
        Ok(rate)
    }

    /// Due date for a checkout made at `checked_out_at`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidArgument` if the due date falls outside
    /// the representable calendar.
    pub fn due_date(&self, checked_out_at: DateTime<Utc>) -> Result<DateTime<Utc>> {
        checked_out_at
            .checked_add_signed(Duration::days(i64::from(self.loan_days)))
            .ok_or_else(|| {
                LedgerError::InvalidArgument(format!(
                    "a {}-day loan starting {} has no representable due date",
                    self.loan_days, checked_out_at
                ))
            })
    }

    /// Late fee for a loan returned at `now`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidArgument` if the fee overflows.
    pub fn penalty_for(&self, loan: &Loan, now: DateTime<Utc>) -> Result<Decimal> {
        let late_days = loan.late_days(now);
        Decimal::from(late_days)
            .checked_mul(self.penalty_rate)
            .ok_or_else(|| {
                LedgerError::InvalidArgument(format!(
                    "late fee for {} days at {} per day is too large",
                    late_days, self.penalty_rate
                ))
            })
    }
}
