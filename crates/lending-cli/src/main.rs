//! Lending CLI - a small lending-library catalog with loans, due dates and late fees
//!
//! This is the command-line interface for Lending. It resolves the ledger
//! file, opens a library session and renders results for terminals, scripts
//! and JSON consumers.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;
mod ui;

use clap::{CommandFactory, Parser};

use crate::app::AppContext;
use crate::cli::{BorrowerCommands, Cli, Commands, ConfigCommands, ItemCommands};
use crate::commands::{borrowers, init, items, loans, maintenance, policy, reports};
use crate::ui::{print_error, UiContext};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    if let Err(err) = run(&cli) {
        let (code, hint) = errors::classify(&err);
        tracing::debug!(error = ?err, code, "command failed");
        let ui = UiContext::from_env(false, None, cli.no_color, cli.ascii);
        print_error(&ui, &error_text(&err), hint);
        std::process::exit(code);
    }
}

/// The error and its causes on one line, outermost first.
fn error_text(err: &anyhow::Error) -> String {
    err.chain()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let app = AppContext::new(cli);

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Init(args) => init::handle_init(&app, args),
        Commands::Item(ItemCommands::Add(args)) => items::handle_add(&app, args),
        Commands::Item(ItemCommands::Remove(args)) => items::handle_remove(&app, args),
        Commands::Item(ItemCommands::List(args)) => items::handle_list(&app, args),
        Commands::Item(ItemCommands::Show(args)) => items::handle_show(&app, args),
        Commands::Borrower(BorrowerCommands::Add(args)) => borrowers::handle_add(&app, args),
        Commands::Borrower(BorrowerCommands::List(args)) => borrowers::handle_list(&app, args),
        Commands::Borrower(BorrowerCommands::Show(args)) => borrowers::handle_show(&app, args),
        Commands::Checkout(args) => loans::handle_checkout(&app, args),
        Commands::Return(args) => loans::handle_return(&app, args),
        Commands::Overdue(args) => loans::handle_overdue(&app, args),
        Commands::Search(args) => reports::handle_search(&app, args),
        Commands::Stats(args) => reports::handle_stats(&app, args),
        Commands::Config(ConfigCommands::Show(args)) => policy::handle_show(&app, args),
        Commands::Config(ConfigCommands::Set(args)) => policy::handle_set(&app, args),
        Commands::Check(args) => maintenance::handle_check(&app, args),
        Commands::Completions(args) => maintenance::handle_completions(args.shell),
    }
}
