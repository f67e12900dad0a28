use std::path::PathBuf;

use lending_core::{JsonFileStore, Library};

use crate::app::{parse_timezone, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_ledger_path, write_config, LendingConfig};
use crate::errors::CliError;
use crate::ui::{self, hint, print, receipt};

/// Create a ledger with the default policy and write the CLI config.
///
/// An existing config file is left alone so `init` can create additional
/// ledgers without repointing the default one.
pub fn handle_init(app: &AppContext<'_>, args: &InitArgs) -> anyhow::Result<()> {
    let ui = app.default_ui()?;

    let target = match args.path.as_deref().or(app.cli().ledger.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => default_ledger_path()?,
    };
    if target.exists() {
        return Err(CliError::invalid_input(format!(
            "A ledger already exists at {}",
            target.display()
        ))
        .into());
    }

    let timezone = args
        .timezone
        .as_deref()
        .map(|name| parse_timezone(name).map(|tz| tz.name().to_string()))
        .transpose()?;

    let opened = Library::open(JsonFileStore::new(&target))?;
    if let Some(err) = opened.save_error {
        return Err(anyhow::Error::new(err).context(format!(
            "Failed to create ledger at {}",
            target.display()
        )));
    }
    let policy = opened.value.ledger().policy();
    tracing::info!(path = %target.display(), "initialized ledger");

    let config_path = match args.config_path.as_deref() {
        Some(path) => PathBuf::from(path),
        None => app.config_path()?.to_path_buf(),
    };
    let config_written = if config_path.exists() {
        false
    } else {
        write_config(&config_path, &LendingConfig::new(target.clone(), timezone))?;
        true
    };

    if app.quiet() {
        return Ok(());
    }
    let mut items = vec![
        ("Ledger", target.display().to_string()),
        ("Loan Days", policy.loan_days.to_string()),
        ("Penalty Rate", ui::format_money(policy.penalty_rate)),
    ];
    if config_written {
        items.push(("Config", config_path.display().to_string()));
    }
    print(&ui, &receipt(&ui, "Initialized ledger", &items));
    if !config_written {
        print(
            &ui,
            &hint(
                &ui,
                &format!(
                    "config at {} left unchanged; pass --ledger {} to use this ledger",
                    config_path.display(),
                    target.display()
                ),
            ),
        );
    }
    Ok(())
}
