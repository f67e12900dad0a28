//! JSON output formatting.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use lending_core::{Borrower, IntegrityIssue, Item, LoanPolicy, Statistics};

/// Convert an item to JSON, including its loan state at `now`.
pub fn item_json(item: &Item, now: DateTime<Utc>) -> Value {
    let loan = item.loan.as_ref();
    json!({
        "id": item.id,
        "title": item.title,
        "author": item.author,
        "available": item.is_available(),
        "holder": loan.map(|l| l.holder.as_str()),
        "checked_out_at": loan.map(|l| l.checked_out_at),
        "due_at": loan.map(|l| l.due_at),
        "overdue": loan.is_some_and(|l| l.is_overdue(now)),
        "late_days": loan.map(|l| l.late_days(now)).unwrap_or(0),
        "checkout_count": item.checkout_count,
    })
}

pub fn items_json<'a>(items: impl IntoIterator<Item = &'a Item>, now: DateTime<Utc>) -> Value {
    Value::Array(items.into_iter().map(|item| item_json(item, now)).collect())
}

pub fn borrower_json(borrower: &Borrower) -> Value {
    json!({
        "id": borrower.id,
        "name": borrower.name,
        "holding": borrower.holding,
        "history": borrower.history,
        "penalties": borrower.penalties,
    })
}

pub fn borrowers_json<'a>(borrowers: impl IntoIterator<Item = &'a Borrower>) -> Value {
    Value::Array(borrowers.into_iter().map(borrower_json).collect())
}

pub fn statistics_json(stats: &Statistics) -> Value {
    json!({
        "total_items": stats.total_items,
        "available_items": stats.available_items,
        "checked_out_items": stats.checked_out_items,
        "total_borrowers": stats.total_borrowers,
        "total_penalties": stats.total_penalties,
        "most_borrowed": stats.most_borrowed.as_ref().map(|top| json!({
            "id": top.id,
            "title": top.title,
            "checkouts": top.checkouts,
        })),
        "most_active": stats.most_active.as_ref().map(|top| json!({
            "id": top.id,
            "name": top.name,
            "checkouts": top.checkouts,
        })),
    })
}

pub fn policy_json(policy: &LoanPolicy, ledger_path: &str, source: &str) -> Value {
    json!({
        "loan_days": policy.loan_days,
        "penalty_rate": policy.penalty_rate,
        "ledger": ledger_path,
        "ledger_source": source,
    })
}

pub fn integrity_json(issues: &[IntegrityIssue]) -> Value {
    json!({
        "ok": issues.is_empty(),
        "issues": issues.iter().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

/// Pretty-print a JSON value to stdout.
pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
