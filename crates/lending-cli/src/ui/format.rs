//! String formatting utilities for UI rendering.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// Format a timestamp for display.
///
/// Pretty output uses the configured timezone at minute precision; plain
/// output is always RFC 3339 in UTC so scripts see a stable value.
pub fn format_datetime(dt: &DateTime<Utc>, tz: Tz, pretty: bool) -> String {
    if pretty {
        dt.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string()
    } else {
        dt.to_rfc3339()
    }
}

/// Format a currency amount with two decimals.
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Human description of how a due date relates to `now`.
pub fn due_status(due_at: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    if *due_at >= *now {
        match (*due_at - *now).num_days() {
            0 => "due today".to_string(),
            1 => "due in 1 day".to_string(),
            n => format!("due in {} days", n),
        }
    } else {
        match (*now - *due_at).num_days() {
            0 => "overdue".to_string(),
            1 => "1 day late".to_string(),
            n => format!("{} days late", n),
        }
    }
}
