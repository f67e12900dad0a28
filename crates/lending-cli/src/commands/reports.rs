use lending_core::SearchField;

use crate::app::AppContext;
use crate::cli::{OutputArgs, SearchArgs};
use crate::output::{item_rows, items_json, print_json, statistics_json, ITEM_COLUMNS};
use crate::ui::{format_money, header, kv, print, simple_table, table, Column};

const STATS_COLUMNS: [Column; 2] = [Column::new("Metric"), Column::new("Value")];

pub fn handle_search(app: &AppContext<'_>, args: &SearchArgs) -> anyhow::Result<()> {
    let field: SearchField = args.field.parse()?;
    let ui = app.ui(&args.output)?;
    let library = app.open_library(&ui)?;
    let now = library.now();
    let items = library.search(field, &args.text);

    if ui.mode.is_json() {
        return print_json(&items_json(items, now));
    }
    if !app.quiet() {
        let context = format!("{} ~ {}, {} found", field, args.text, items.len());
        print(&ui, &header(&ui, "search", Some(&context)));
    }
    if !items.is_empty() {
        print(&ui, &simple_table(&ui, &ITEM_COLUMNS, &item_rows(&ui, items, now)));
    }
    Ok(())
}

pub fn handle_stats(app: &AppContext<'_>, args: &OutputArgs) -> anyhow::Result<()> {
    let ui = app.ui(args)?;
    let library = app.open_library(&ui)?;
    let stats = library.statistics();

    if ui.mode.is_json() {
        return print_json(&statistics_json(&stats));
    }
    let most_borrowed = match &stats.most_borrowed {
        Some(top) if ui.mode.is_pretty() => {
            format!("{} ({}, {} checkouts)", top.title, top.id, top.checkouts)
        }
        Some(top) => top.id.clone(),
        None => "-".to_string(),
    };
    let most_active = match &stats.most_active {
        Some(top) if ui.mode.is_pretty() => {
            format!("{} ({}, {} checkouts)", top.name, top.id, top.checkouts)
        }
        Some(top) => top.id.clone(),
        None => "-".to_string(),
    };
    let rows = [
        ("Items", stats.total_items.to_string()),
        ("Available", stats.available_items.to_string()),
        ("Checked Out", stats.checked_out_items.to_string()),
        ("Borrowers", stats.total_borrowers.to_string()),
        ("Penalties", format_money(stats.total_penalties)),
        ("Most Borrowed", most_borrowed),
        ("Most Active", most_active),
    ];

    if !app.quiet() {
        print(&ui, &header(&ui, "stats", None));
    }
    if ui.mode.is_pretty() {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|(label, value)| vec![label.to_string(), value])
            .collect();
        print(&ui, &table(&ui, &STATS_COLUMNS, &rows));
    } else {
        for (label, value) in &rows {
            print(&ui, &kv(&ui, label, value));
        }
    }
    Ok(())
}
