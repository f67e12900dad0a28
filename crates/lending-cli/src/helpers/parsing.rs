//! Parsing helpers for money and free-text arguments.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::CliError;

/// Parse a currency amount such as `0.5` or `1.25`.
///
/// Sign checks are left to the ledger so the error kind stays the same
/// whichever front end submits the value.
pub fn parse_money(value: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(value.trim()).map_err(|_| {
        CliError::invalid_input(format!("Invalid amount: {} (expected e.g. 0.5)", value)).into()
    })
}

/// Reject blank values for required text fields.
pub fn require_text(label: &str, value: &str) -> anyhow::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::invalid_input(format!("{} must not be empty", label)).into());
    }
    Ok(trimmed.to_string())
}
