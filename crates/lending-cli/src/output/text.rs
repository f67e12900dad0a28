//! Text and table output for items and borrowers.

use chrono::{DateTime, Utc};

use lending_core::{Borrower, Item};

use crate::ui::theme::{styled, styles, NONE, ON_LOAN};
use crate::ui::{
    blank_line, due_status, format_datetime, format_money, header, kv, print, truncate,
};
use crate::ui::{Column, UiContext};

pub const ITEM_COLUMNS: [Column; 5] = [
    Column::new("ID"),
    Column::new("Title"),
    Column::new("Author"),
    Column::new("Holder"),
    Column::new("Due"),
];

pub const BORROWER_COLUMNS: [Column; 4] = [
    Column::new("ID"),
    Column::new("Name"),
    Column::new("Holding"),
    Column::new("Penalties"),
];

/// Longest title shown in pretty listings.
const TITLE_WIDTH: usize = 40;

/// One table row per item. Absent holder and due date render as a dash.
pub fn item_rows<'a>(
    ctx: &UiContext,
    items: impl IntoIterator<Item = &'a Item>,
    now: DateTime<Utc>,
) -> Vec<Vec<String>> {
    let pretty = ctx.mode.is_pretty();
    let none = NONE.get(ctx.unicode && pretty).to_string();
    let title = |item: &Item| {
        if pretty {
            truncate(&item.title, TITLE_WIDTH)
        } else {
            item.title.clone()
        }
    };
    items
        .into_iter()
        .map(|item| match &item.loan {
            Some(loan) => {
                let due = if pretty {
                    let text = format!(
                        "{} ({})",
                        format_datetime(&loan.due_at, ctx.timezone, true),
                        due_status(&loan.due_at, &now)
                    );
                    if loan.is_overdue(now) {
                        styled(&text, styles::error(), ctx.color)
                    } else {
                        text
                    }
                } else {
                    format_datetime(&loan.due_at, ctx.timezone, false)
                };
                let id = if pretty {
                    format!("{} {}", ON_LOAN.get(ctx.unicode), item.id)
                } else {
                    item.id.clone()
                };
                vec![
                    id,
                    title(item),
                    item.author.clone(),
                    loan.holder.clone(),
                    due,
                ]
            }
            None => vec![
                if pretty {
                    format!("  {}", item.id)
                } else {
                    item.id.clone()
                },
                title(item),
                item.author.clone(),
                none.clone(),
                none.clone(),
            ],
        })
        .collect()
}

pub fn borrower_rows<'a>(
    borrowers: impl IntoIterator<Item = &'a Borrower>,
) -> Vec<Vec<String>> {
    borrowers
        .into_iter()
        .map(|borrower| {
            vec![
                borrower.id.clone(),
                borrower.name.clone(),
                borrower.holding.len().to_string(),
                format_money(borrower.penalties),
            ]
        })
        .collect()
}

/// Print the detail view of one item.
pub fn print_item(ctx: &UiContext, item: &Item, now: DateTime<Utc>) {
    print(ctx, &header(ctx, "item", Some(&item.id)));
    print(ctx, &kv(ctx, "Title", &item.title));
    print(ctx, &kv(ctx, "Author", &item.author));
    print(ctx, &kv(ctx, "Checkouts", &item.checkout_count.to_string()));
    match &item.loan {
        Some(loan) => {
            print(ctx, &kv(ctx, "Status", "checked out"));
            print(ctx, &kv(ctx, "Holder", &loan.holder));
            print(
                ctx,
                &kv(
                    ctx,
                    "Checked Out",
                    &format_datetime(&loan.checked_out_at, ctx.timezone, ctx.mode.is_pretty()),
                ),
            );
            print(
                ctx,
                &kv(
                    ctx,
                    "Due At",
                    &format_datetime(&loan.due_at, ctx.timezone, ctx.mode.is_pretty()),
                ),
            );
            if ctx.mode.is_pretty() {
                print(ctx, &kv(ctx, "Due", &due_status(&loan.due_at, &now)));
            } else {
                print(ctx, &kv(ctx, "Late Days", &loan.late_days(now).to_string()));
            }
        }
        None => print(ctx, &kv(ctx, "Status", "available")),
    }
}

/// Print the detail view of one borrower.
///
/// `title_of` resolves item identifiers to titles for the held and history
/// lists; unknown identifiers are shown as-is.
pub fn print_borrower<'a>(
    ctx: &UiContext,
    borrower: &Borrower,
    title_of: impl Fn(&str) -> Option<&'a str>,
) {
    let describe = |id: &str| match title_of(id) {
        Some(title) if ctx.mode.is_pretty() => format!("{} ({})", id, title),
        _ => id.to_string(),
    };

    print(ctx, &header(ctx, "borrower", Some(&borrower.id)));
    print(ctx, &kv(ctx, "Name", &borrower.name));
    print(ctx, &kv(ctx, "Penalties", &format_money(borrower.penalties)));
    print(ctx, &kv(ctx, "Checkouts", &borrower.history.len().to_string()));

    if ctx.mode.is_pretty() {
        blank_line(ctx);
        print(ctx, &kv(ctx, "Holding", &borrower.holding.len().to_string()));
        for id in &borrower.holding {
            print(ctx, &format!("  {} {}", ON_LOAN.get(ctx.unicode), describe(id)));
        }
        blank_line(ctx);
        print(ctx, &kv(ctx, "History", ""));
        for (n, id) in borrower.history.iter().enumerate() {
            print(ctx, &format!("  {:>3}. {}", n + 1, describe(id)));
        }
    } else {
        let holding: Vec<&str> = borrower.holding.iter().map(String::as_str).collect();
        print(ctx, &kv(ctx, "Holding", &holding.join(",")));
        print(ctx, &kv(ctx, "History", &borrower.history.join(",")));
    }
}
