use lending_core::{Borrower, LedgerError};

use crate::app::AppContext;
use crate::cli::{BorrowerAddArgs, OutputArgs, ShowArgs};
use crate::helpers::{require_field, require_text};
use crate::output::{
    borrower_json, borrower_rows, borrowers_json, print_borrower, print_json, BORROWER_COLUMNS,
};
use crate::ui::{header, hint, print, receipt, simple_table};

pub fn handle_add(app: &AppContext<'_>, args: &BorrowerAddArgs) -> anyhow::Result<()> {
    let ui = app.default_ui()?;
    let id = require_text("Borrower ID", &args.id)?;
    let name = require_field(&ui, "Name", "--name", args.name.as_deref(), args.no_input)?;

    let mut library = app.open_library(&ui)?;
    let applied = library.add_borrower(Borrower::new(id.clone(), name.clone()))?;
    app.finish(&ui, applied, "borrower added");

    if !app.quiet() {
        print(
            &ui,
            &receipt(&ui, "Added borrower", &[("ID", id), ("Name", name)]),
        );
    }
    Ok(())
}

pub fn handle_list(app: &AppContext<'_>, args: &OutputArgs) -> anyhow::Result<()> {
    let ui = app.ui(args)?;
    let library = app.open_library(&ui)?;
    let borrowers: Vec<&Borrower> = library.ledger().borrowers().collect();

    if ui.mode.is_json() {
        return print_json(&borrowers_json(borrowers));
    }
    if !app.quiet() {
        print(&ui, &header(&ui, "borrowers", None));
    }
    if borrowers.is_empty() {
        if !app.quiet() && ui.mode.is_pretty() {
            print(&ui, &hint(&ui, "register one with `lending borrower add <ID>`"));
        }
        return Ok(());
    }
    print(
        &ui,
        &simple_table(&ui, &BORROWER_COLUMNS, &borrower_rows(borrowers)),
    );
    Ok(())
}

pub fn handle_show(app: &AppContext<'_>, args: &ShowArgs) -> anyhow::Result<()> {
    let ui = app.ui(&OutputArgs::json_only(args.json))?;
    let id = require_text("Borrower ID", &args.id)?;
    let library = app.open_library(&ui)?;
    let ledger = library.ledger();
    let borrower = ledger
        .borrower(&id)
        .ok_or_else(|| LedgerError::NotFound(format!("borrower \"{}\"", id)))?;

    if ui.mode.is_json() {
        return print_json(&borrower_json(borrower));
    }
    print_borrower(&ui, borrower, |id| {
        ledger.item(id).map(|item| item.title.as_str())
    });
    Ok(())
}
