use crate::app::AppContext;
use crate::cli::{CheckoutArgs, IdArgs, OutputArgs};
use crate::helpers::require_text;
use crate::output::{item_rows, items_json, print_json, ITEM_COLUMNS};
use crate::ui::theme::{styled, styles};
use crate::ui::{format_datetime, format_money, header, print, receipt, simple_table};

pub fn handle_checkout(app: &AppContext<'_>, args: &CheckoutArgs) -> anyhow::Result<()> {
    let ui = app.default_ui()?;
    let item_id = require_text("Item ID", &args.item)?;
    let borrower_id = require_text("Borrower ID", &args.borrower)?;
    let mut library = app.open_library(&ui)?;
    let applied = library.checkout(&item_id, &borrower_id)?;
    let loan = app.finish(&ui, applied, "checkout recorded");

    if !app.quiet() {
        print(
            &ui,
            &receipt(
                &ui,
                "Checked out",
                &[
                    ("Item", item_id),
                    ("Borrower", loan.holder.clone()),
                    (
                        "Due At",
                        format_datetime(&loan.due_at, ui.timezone, ui.mode.is_pretty()),
                    ),
                ],
            ),
        );
    }
    Ok(())
}

pub fn handle_return(app: &AppContext<'_>, args: &IdArgs) -> anyhow::Result<()> {
    let ui = app.default_ui()?;
    let id = require_text("Item ID", &args.id)?;
    let mut library = app.open_library(&ui)?;
    let applied = library.return_item(&id)?;
    let returned = app.finish(&ui, applied, "return recorded");

    if !app.quiet() {
        let penalty = format_money(returned.penalty);
        let penalty = if returned.late_days > 0 {
            styled(&penalty, styles::warning(), ui.color)
        } else {
            penalty
        };
        print(
            &ui,
            &receipt(
                &ui,
                "Returned",
                &[
                    ("Item", returned.item_id),
                    ("Borrower", returned.borrower_id),
                    ("Late Days", returned.late_days.to_string()),
                    ("Penalty", penalty),
                ],
            ),
        );
    }
    Ok(())
}

pub fn handle_overdue(app: &AppContext<'_>, args: &OutputArgs) -> anyhow::Result<()> {
    let ui = app.ui(args)?;
    let library = app.open_library(&ui)?;
    let now = library.now();
    let items = library.overdue_items();

    if ui.mode.is_json() {
        return print_json(&items_json(items, now));
    }
    if !app.quiet() {
        let count = items.len().to_string();
        print(&ui, &header(&ui, "overdue", Some(&count)));
    }
    if !items.is_empty() {
        print(&ui, &simple_table(&ui, &ITEM_COLUMNS, &item_rows(&ui, items, now)));
    }
    Ok(())
}
