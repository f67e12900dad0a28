use lending_core::{Item, LedgerError};

use crate::app::AppContext;
use crate::cli::{IdArgs, ItemAddArgs, ItemListArgs, OutputArgs, ShowArgs};
use crate::helpers::{require_field, require_text};
use crate::output::{item_json, item_rows, items_json, print_item, print_json, ITEM_COLUMNS};
use crate::ui::{header, hint, print, receipt, simple_table};

pub fn handle_add(app: &AppContext<'_>, args: &ItemAddArgs) -> anyhow::Result<()> {
    let ui = app.default_ui()?;
    let id = require_text("Item ID", &args.id)?;
    let title = require_field(&ui, "Title", "--title", args.title.as_deref(), args.no_input)?;
    let author = require_field(&ui, "Author", "--author", args.author.as_deref(), args.no_input)?;

    let mut library = app.open_library(&ui)?;
    let applied = library.add_item(Item::new(id.clone(), title.clone(), author))?;
    app.finish(&ui, applied, "item added");

    if !app.quiet() {
        print(
            &ui,
            &receipt(&ui, "Added item", &[("ID", id), ("Title", title)]),
        );
    }
    Ok(())
}

pub fn handle_remove(app: &AppContext<'_>, args: &IdArgs) -> anyhow::Result<()> {
    let ui = app.default_ui()?;
    let id = require_text("Item ID", &args.id)?;
    let mut library = app.open_library(&ui)?;
    let applied = library.remove_item(&id)?;
    let removed = app.finish(&ui, applied, "item removed");

    if !app.quiet() {
        print(
            &ui,
            &receipt(
                &ui,
                "Removed item",
                &[("ID", removed.id), ("Title", removed.title)],
            ),
        );
    }
    Ok(())
}

pub fn handle_list(app: &AppContext<'_>, args: &ItemListArgs) -> anyhow::Result<()> {
    let ui = app.ui(&args.output)?;
    let library = app.open_library(&ui)?;
    let now = library.now();

    let (items, context) = if args.available {
        (library.available_items(), Some("available"))
    } else if args.overdue {
        (library.overdue_items(), Some("overdue"))
    } else {
        (library.ledger().items().collect(), None)
    };

    if ui.mode.is_json() {
        return print_json(&items_json(items, now));
    }
    if !app.quiet() {
        print(&ui, &header(&ui, "items", context));
    }
    if items.is_empty() {
        if !app.quiet() && ui.mode.is_pretty() {
            print(&ui, &hint(&ui, "no matching items; add one with `lending item add <ID>`"));
        }
        return Ok(());
    }
    print(&ui, &simple_table(&ui, &ITEM_COLUMNS, &item_rows(&ui, items, now)));
    Ok(())
}

pub fn handle_show(app: &AppContext<'_>, args: &ShowArgs) -> anyhow::Result<()> {
    let ui = app.ui(&OutputArgs::json_only(args.json))?;
    let id = require_text("Item ID", &args.id)?;
    let library = app.open_library(&ui)?;
    let item = library
        .ledger()
        .item(&id)
        .ok_or_else(|| LedgerError::NotFound(format!("item \"{}\"", id)))?;

    if ui.mode.is_json() {
        return print_json(&item_json(item, library.now()));
    }
    print_item(&ui, item, library.now());
    Ok(())
}
