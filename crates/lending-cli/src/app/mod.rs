//! Application-level utilities for the Lending CLI.
//!
//! - Path resolution for config and ledger files
//! - The per-invocation context that opens the library session

mod context;
mod resolver;

pub use context::{parse_timezone, AppContext};
