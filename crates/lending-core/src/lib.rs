//! # Lending Core
//!
//! Core library for Lending - a small lending-library catalog with loans,
//! due dates and late fees.
//!
//! This crate provides the ledger, its invariants and its persistence
//! contract, independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **model**: items, borrowers, loans and the loan policy
//! - **ledger**: registries, checkout/return, search and statistics
//! - **storage**: the `LedgerStore` trait, document shape, JSON file and memory backends
//! - **library**: a ledger session that saves after every successful mutation
//! - **clock**: injectable time source

pub mod clock;
pub mod error;
pub mod fs;
pub mod ledger;
pub mod library;
pub mod model;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorKind, LedgerError, Result};
pub use ledger::{IntegrityIssue, Ledger, ReturnReceipt, SearchField, Statistics};
pub use library::{Applied, Library, OpenMode};
pub use model::{Borrower, Item, Loan, LoanPolicy};
pub use storage::{JsonFileStore, LedgerStore, MemoryStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
