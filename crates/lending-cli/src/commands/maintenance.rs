use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::app::AppContext;
use crate::cli::{Cli, OutputArgs};
use crate::errors::CliError;
use crate::output::{integrity_json, print_json};
use crate::ui::{badge, hint, print, Badge, OutputMode};

/// Report every broken invariant in the loaded ledger.
///
/// Exits with the integrity exit code when anything is wrong, so scripts can
/// gate on it.
pub fn handle_check(app: &AppContext<'_>, args: &OutputArgs) -> anyhow::Result<()> {
    let ui = app.ui(args)?;
    let library = app.open_library(&ui)?;
    let issues = library.integrity_report();

    if ui.mode.is_json() {
        print_json(&integrity_json(&issues))?;
    } else if issues.is_empty() {
        if !app.quiet() {
            print(&ui, &badge(&ui, Badge::Ok, "Integrity check: OK"));
        }
    } else {
        eprintln!("{}", badge(&ui, Badge::Err, "Integrity check: FAILED"));
        for issue in &issues {
            match ui.mode {
                OutputMode::Pretty => eprintln!("  - {}", issue),
                _ => eprintln!("issue={}", issue),
            }
        }
        eprintln!(
            "{}",
            hint(&ui, "edit the ledger file by hand; changes are refused until it is consistent")
        );
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CliError::IntegrityFailed {
            issues: issues.len(),
        }
        .into())
    }
}

pub fn handle_completions(shell: Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "lending", &mut std::io::stdout());
    Ok(())
}
