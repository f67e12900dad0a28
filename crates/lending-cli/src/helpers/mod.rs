//! Input and parsing helper functions for the CLI.
//!
//! - Prompting for item and borrower fields left off the command line (`input`)
//! - Money and text argument parsing (`parsing`)

mod input;
mod parsing;

pub use input::require_field;
pub use parsing::{parse_money, require_text};
