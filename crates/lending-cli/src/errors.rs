//! CLI error types for structured error handling.
//!
//! Ledger failures keep their kind through `anyhow` and are mapped to exit
//! codes and hints here, once, at the top of `main`.

use std::fmt;

use lending_core::{ErrorKind, LedgerError};

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Invalid user input caught before reaching the ledger.
    InvalidInput(String),

    /// A ledger that loaded but violates its invariants.
    IntegrityFailed { issues: usize },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::IntegrityFailed { issues } => {
                write!(f, "Integrity check failed ({} issue(s))", issues)
            }
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed { .. } => exit_codes::INTEGRITY_FAILED,
        }
    }
}

/// Exit code for a ledger failure kind.
pub fn ledger_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::NotFound => exit_codes::NOT_FOUND,
        ErrorKind::InvalidArgument => exit_codes::INVALID_INPUT,
        ErrorKind::DuplicateKey => exit_codes::DUPLICATE,
        ErrorKind::Unavailable => exit_codes::UNAVAILABLE,
        ErrorKind::Conflict => exit_codes::CONFLICT,
        ErrorKind::Consistency => exit_codes::INTEGRITY_FAILED,
        ErrorKind::Storage | ErrorKind::Serialization => exit_codes::STORAGE,
    }
}

/// Follow-up command suggested for a ledger failure kind.
pub fn ledger_hint(kind: ErrorKind) -> Option<&'static str> {
    match kind {
        ErrorKind::NotFound => Some("lending item list / lending borrower list"),
        ErrorKind::Unavailable => Some("lending item show <ID> to see the holder"),
        ErrorKind::Conflict => Some("lending return <ID> first"),
        ErrorKind::Consistency => Some("lending check lists the violations"),
        ErrorKind::Serialization => Some("the ledger file is not a valid lending document"),
        ErrorKind::DuplicateKey | ErrorKind::InvalidArgument | ErrorKind::Storage => None,
    }
}

/// Resolve the exit code and hint for any error reaching `main`.
pub fn classify(err: &anyhow::Error) -> (i32, Option<&'static str>) {
    if let Some(ledger) = err.downcast_ref::<LedgerError>() {
        let kind = ledger.kind();
        return (ledger_exit_code(kind), ledger_hint(kind));
    }
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return (cli.exit_code(), None);
    }
    (1, None)
}
