//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors, one per ledger failure kind
pub mod exit_codes {
    /// Unknown item or borrower, or item not on loan.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Identifier already registered.
    pub const DUPLICATE: i32 = 5;

    /// Item already checked out.
    pub const UNAVAILABLE: i32 = 6;

    /// Item checked out; cannot be removed.
    pub const CONFLICT: i32 = 7;

    /// Ledger invariants violated (integrity check failed).
    pub const INTEGRITY_FAILED: i32 = 8;

    /// Ledger file unreadable or malformed.
    pub const STORAGE: i32 = 9;
}

/// Default file name of the ledger document.
pub const DEFAULT_LEDGER_FILE: &str = "library.json";
