//! In-memory storage backend.
//!
//! Keeps the serialized JSON text rather than the document value so saves
//! and loads go through the same encoding as the file backend.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::traits::LedgerStore;
use super::types::LedgerDocument;
use crate::error::{LedgerError, Result};

/// Ledger document held in memory, with switchable save failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: Mutex<Option<String>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `document`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Serialization` if the document cannot be encoded.
    pub fn with_document(document: &LedgerDocument) -> Result<Self> {
        let store = Self::new();
        *store.lock()? = Some(serde_json::to_string(document)?);
        Ok(store)
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The raw stored JSON, if anything has been saved.
    pub fn raw(&self) -> Option<String> {
        self.lock().ok().and_then(|guard| guard.clone())
    }

    /// Overwrite the stored JSON text.
    pub fn set_raw(&self, json: impl Into<String>) {
        if let Ok(mut guard) = self.lock() {
            *guard = Some(json.into());
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<String>>> {
        self.contents
            .lock()
            .map_err(|_| LedgerError::Storage("memory store poisoned".to_string()))
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<Option<LedgerDocument>> {
        match self.lock()?.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, document: &LedgerDocument) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage("memory store is read-only".to_string()));
        }
        let json = serde_json::to_string(document)?;
        *self.lock()? = Some(json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;

    #[test]
    fn test_empty_store_loads_none() {
        assert!(MemoryStore::new().load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let document = LedgerDocument::from(&Ledger::default());
        store.save(&document).unwrap();
        assert_eq!(store.load().unwrap(), Some(document));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_failing_store_keeps_previous_document() {
        let document = LedgerDocument::from(&Ledger::default());
        let store = MemoryStore::with_document(&document).unwrap();
        store.set_fail_saves(true);

        let mut changed = document.clone();
        changed.loan_days = 30;
        assert!(store.save(&changed).is_err());
        assert_eq!(store.load().unwrap(), Some(document));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_garbage_is_serialization_error() {
        let store = MemoryStore::new();
        store.set_raw("{not json");
        let err = store.load().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Serialization);
    }
}
