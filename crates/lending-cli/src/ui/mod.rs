//! UI primitives for the Lending CLI.
//!
//! - **context**: environment detection (TTY, width, color, unicode, timezone)
//! - **mode**: output mode resolution (json, plain, pretty)
//! - **theme**: badges, symbols and styles
//! - **render**: tables, headers, receipts, hints, errors
//! - **format**: timestamps, money and due-date wording

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::{OutputMode, TextFormat};
pub use theme::Badge;

pub use render::{
    badge, blank_line, header, hint, kv, print, print_error, print_warning, receipt,
    simple_table, table, Column,
};

pub use format::{due_status, format_datetime, format_money, truncate};
