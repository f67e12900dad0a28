//! Search and reporting over the ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::Ledger;
use crate::error::LedgerError;
use crate::model::Item;

/// Field matched by [`Ledger::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Case-insensitive substring of the title
    Title,
    /// Case-insensitive substring of the author
    Author,
    /// Exact catalog number
    Identifier,
}

impl FromStr for SearchField {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "identifier" | "id" | "isbn" => Ok(Self::Identifier),
            other => Err(LedgerError::InvalidArgument(format!(
                "unknown search field \"{}\" (use title, author or identifier)",
                other
            ))),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Identifier => "identifier",
        };
        f.write_str(name)
    }
}

/// The most frequently borrowed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopItem {
    pub id: String,
    pub title: String,
    pub checkouts: u64,
}

/// The borrower with the longest checkout history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopBorrower {
    pub id: String,
    pub name: String,
    pub checkouts: usize,
}

/// Aggregate counts over the whole ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub total_items: usize,
    pub available_items: usize,
    pub checked_out_items: usize,
    pub total_borrowers: usize,
    pub total_penalties: Decimal,
    pub most_borrowed: Option<TopItem>,
    pub most_active: Option<TopBorrower>,
}

impl Ledger {
    /// Find items by title, author or catalog number.
    pub fn search(&self, field: SearchField, text: &str) -> Vec<&Item> {
        match field {
            SearchField::Identifier => self.items.get(text).into_iter().collect(),
            SearchField::Title | SearchField::Author => {
                let needle = text.to_lowercase();
                self.items
                    .values()
                    .filter(|item| {
                        let haystack = if field == SearchField::Title {
                            &item.title
                        } else {
                            &item.author
                        };
                        haystack.to_lowercase().contains(&needle)
                    })
                    .collect()
            }
        }
    }

    /// Items currently on the shelf.
    pub fn available_items(&self) -> Vec<&Item> {
        self.items.values().filter(|item| item.is_available()).collect()
    }

    /// Items on loan whose due date is strictly before `now`.
    pub fn overdue_items(&self, now: DateTime<Utc>) -> Vec<&Item> {
        self.items
            .values()
            .filter(|item| item.loan.as_ref().is_some_and(|loan| loan.is_overdue(now)))
            .collect()
    }

    /// Summary counts, the most borrowed item and the most active borrower.
    ///
    /// Ties go to the first entry in registry order; entries with a zero
    /// count never qualify.
    pub fn statistics(&self) -> Statistics {
        let available_items = self.items.values().filter(|i| i.is_available()).count();

        let mut most_borrowed: Option<TopItem> = None;
        for item in self.items.values() {
            let best = most_borrowed.as_ref().map_or(0, |top| top.checkouts);
            if item.checkout_count > best {
                most_borrowed = Some(TopItem {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    checkouts: item.checkout_count,
                });
            }
        }

        let mut most_active: Option<TopBorrower> = None;
        for borrower in self.borrowers.values() {
            let best = most_active.as_ref().map_or(0, |top| top.checkouts);
            if borrower.history.len() > best {
                most_active = Some(TopBorrower {
                    id: borrower.id.clone(),
                    name: borrower.name.clone(),
                    checkouts: borrower.history.len(),
                });
            }
        }

        Statistics {
            total_items: self.items.len(),
            available_items,
            checked_out_items: self.items.len() - available_items,
            total_borrowers: self.borrowers.len(),
            total_penalties: self
                .borrowers
                .values()
                .fold(Decimal::ZERO, |sum, b| sum.saturating_add(b.penalties)),
            most_borrowed,
            most_active,
        }
    }
}
