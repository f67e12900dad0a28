//! Storage trait definition.
//!
//! `LedgerStore` is the persistence seam of a [`crate::Library`]. Backends
//! only move whole documents; all ledger semantics stay in the core.

use super::types::LedgerDocument;
use crate::error::Result;

/// Load/save interface for a ledger document.
///
/// Implementations must ensure:
/// - `load` distinguishes "nothing stored yet" (`Ok(None)`) from failure
/// - `save` replaces the stored document as a whole
pub trait LedgerStore: Send + Sync {
    /// Load the stored document.
    ///
    /// # Returns
    ///
    /// `Ok(Some(document))` if a document exists, `Ok(None)` if nothing has
    /// been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the backend cannot be read and
    /// `LedgerError::Serialization` if the stored bytes are not a valid
    /// document.
    fn load(&self) -> Result<Option<LedgerDocument>>;

    /// Replace the stored document.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the backend cannot be written.
    fn save(&self, document: &LedgerDocument) -> Result<()>;

    /// Human-readable description of where documents are stored.
    fn location(&self) -> String;
}

impl<S: LedgerStore + ?Sized> LedgerStore for Box<S> {
    fn load(&self) -> Result<Option<LedgerDocument>> {
        (**self).load()
    }

    fn save(&self, document: &LedgerDocument) -> Result<()> {
        (**self).save(document)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}
