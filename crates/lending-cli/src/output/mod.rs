//! Output formatting for items, borrowers and reports.
//!
//! `json` builds the machine-readable values printed under `--json`; `text`
//! builds table rows and detail blocks for plain and pretty modes.

mod json;
mod text;

pub use json::{
    borrower_json, borrowers_json, integrity_json, item_json, items_json, policy_json,
    print_json, statistics_json,
};
pub use text::{borrower_rows, item_rows, print_borrower, print_item, BORROWER_COLUMNS, ITEM_COLUMNS};
