//! Error types for lending core operations.
//!
//! Every ledger operation reports failure through [`LedgerError`]. The
//! [`ErrorKind`] classification lets the presentation layer render each
//! failure distinctly without matching on message text.

use thiserror::Error;

/// Result type alias for lending operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Core error type for lending operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// An item or borrower with this identifier is already registered
    #[error("Duplicate identifier: {0}")]
    DuplicateKey(String),

    /// Unknown item or borrower, or returning an item that is not on loan
    #[error("Not found: {0}")]
    NotFound(String),

    /// The item is already checked out
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// The operation conflicts with the item's loan state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rejected configuration value or query argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Ledger invariants are violated; manual repair is required
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// The stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateKey,
    NotFound,
    Unavailable,
    Conflict,
    InvalidArgument,
    Consistency,
    Storage,
    Serialization,
}

impl LedgerError {
    /// The kind of failure, independent of its message.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::DuplicateKey(_) => ErrorKind::DuplicateKey,
            LedgerError::NotFound(_) => ErrorKind::NotFound,
            LedgerError::Unavailable(_) => ErrorKind::Unavailable,
            LedgerError::Conflict(_) => ErrorKind::Conflict,
            LedgerError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            LedgerError::Consistency(_) => ErrorKind::Consistency,
            LedgerError::Storage(_) => ErrorKind::Storage,
            LedgerError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Whether the caller can recover by correcting its request.
    ///
    /// Consistency errors mean the ledger itself is corrupt; persistence
    /// errors depend on the environment rather than the request.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::Consistency | ErrorKind::Storage | ErrorKind::Serialization
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            LedgerError::DuplicateKey("x".into()).kind(),
            ErrorKind::DuplicateKey
        );
        assert_eq!(
            LedgerError::Unavailable("x".into()).kind(),
            ErrorKind::Unavailable
        );
        assert_eq!(
            LedgerError::Consistency("x".into()).kind(),
            ErrorKind::Consistency
        );
    }

    #[test]
    fn test_recoverable_split() {
        assert!(LedgerError::Conflict("held".into()).is_recoverable());
        assert!(LedgerError::InvalidArgument("days".into()).is_recoverable());
        assert!(!LedgerError::Consistency("holder".into()).is_recoverable());
        assert!(!LedgerError::Storage("disk".into()).is_recoverable());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: LedgerError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().contains("read-only"));
    }
}
