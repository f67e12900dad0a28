//! Persistence layer.
//!
//! - **traits**: the `LedgerStore` seam
//! - **types**: the serialized document shape
//! - **json_file**: JSON file backend used by the CLI
//! - **memory**: in-memory backend for tests and embedding

mod json_file;
mod memory;
pub mod traits;
pub mod types;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::LedgerStore;
pub use types::{BorrowerRecord, ItemRecord, LedgerDocument, FORMAT_VERSION};
