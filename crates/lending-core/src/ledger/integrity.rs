//! Cross-registry invariant checks.

use std::fmt;

use super::Ledger;

/// A single broken invariant found by [`Ledger::integrity_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// An item's loan names a borrower that is not registered
    UnknownHolder { item: String, holder: String },
    /// A borrower holds an item that is not in the catalog
    UnknownHeldItem { borrower: String, item: String },
    /// A borrower holds an item whose loan names someone else (or nobody)
    HoldingMismatch { borrower: String, item: String },
    /// An item is on loan but absent from its holder's held set
    MissingFromHolding { item: String, holder: String },
    /// A held item never appears in the borrower's history
    HeldNotInHistory { borrower: String, item: String },
    /// A loan is due before it was checked out
    DueBeforeCheckout { item: String },
    /// A borrower's penalty balance is negative
    NegativePenalty { borrower: String },
    /// A stored item's availability flag contradicts its holder and loan dates
    LoanStateMismatch { item: String },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHolder { item, holder } => {
                write!(f, "item \"{}\" is held by unknown borrower \"{}\"", item, holder)
            }
            Self::UnknownHeldItem { borrower, item } => {
                write!(f, "borrower \"{}\" holds unknown item \"{}\"", borrower, item)
            }
            Self::HoldingMismatch { borrower, item } => write!(
                f,
                "borrower \"{}\" holds item \"{}\" but the item is not on loan to them",
                borrower, item
            ),
            Self::MissingFromHolding { item, holder } => write!(
                f,
                "item \"{}\" is on loan to \"{}\" but missing from their held items",
                item, holder
            ),
            Self::HeldNotInHistory { borrower, item } => write!(
                f,
                "borrower \"{}\" holds item \"{}\" that is not in their history",
                borrower, item
            ),
            Self::DueBeforeCheckout { item } => {
                write!(f, "item \"{}\" is due before it was checked out", item)
            }
            Self::NegativePenalty { borrower } => {
                write!(f, "borrower \"{}\" has a negative penalty balance", borrower)
            }
            Self::LoanStateMismatch { item } => write!(
                f,
                "item \"{}\": availability flag disagrees with holder and loan dates",
                item
            ),
        }
    }
}

impl Ledger {
    /// List every invariant violation in the ledger.
    ///
    /// An empty report means the registries agree with each other.
    pub fn integrity_report(&self) -> Vec<IntegrityIssue> {
        let mut issues = self.load_issues.clone();

        for item in self.items.values() {
            let Some(loan) = &item.loan else {
                continue;
            };
            if loan.due_at < loan.checked_out_at {
                issues.push(IntegrityIssue::DueBeforeCheckout {
                    item: item.id.clone(),
                });
            }
            match self.borrowers.get(&loan.holder) {
                None => issues.push(IntegrityIssue::UnknownHolder {
                    item: item.id.clone(),
                    holder: loan.holder.clone(),
                }),
                Some(borrower) if !borrower.holding.contains(&item.id) => {
                    issues.push(IntegrityIssue::MissingFromHolding {
                        item: item.id.clone(),
                        holder: loan.holder.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        for borrower in self.borrowers.values() {
            if borrower.penalties.is_sign_negative() && !borrower.penalties.is_zero() {
                issues.push(IntegrityIssue::NegativePenalty {
                    borrower: borrower.id.clone(),
                });
            }
            for held in &borrower.holding {
                if !borrower.history.contains(held) {
                    issues.push(IntegrityIssue::HeldNotInHistory {
                        borrower: borrower.id.clone(),
                        item: held.clone(),
                    });
                }
                match self.items.get(held) {
                    None => issues.push(IntegrityIssue::UnknownHeldItem {
                        borrower: borrower.id.clone(),
                        item: held.clone(),
                    }),
                    Some(item) if item.holder() != Some(borrower.id.as_str()) => {
                        issues.push(IntegrityIssue::HoldingMismatch {
                            borrower: borrower.id.clone(),
                            item: held.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        issues
    }
}
