//! Application context for the Lending CLI.
//!
//! Bundles the parsed arguments with the lazily-loaded config file so
//! handlers do not re-read it or thread paths around.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use once_cell::unsync::OnceCell;

use lending_core::{Applied, JsonFileStore, Library};

use crate::cli::{Cli, OutputArgs};
use crate::config::LendingConfig;
use crate::errors::CliError;
use crate::ui::{self, TextFormat, UiContext};

use super::resolver::{load_config, resolve_config_path, resolve_ledger_path, LedgerPathSource};

/// Library session as used by the CLI.
pub type CliLibrary = Library<JsonFileStore>;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config_path: OnceCell<PathBuf>,
    config: OnceCell<Option<LendingConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config_path: OnceCell::new(),
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config_path(&self) -> anyhow::Result<&Path> {
        self.config_path
            .get_or_try_init(resolve_config_path)
            .map(PathBuf::as_path)
    }

    /// The config file, loaded on first use. `None` when no file exists.
    pub fn config(&self) -> anyhow::Result<Option<&LendingConfig>> {
        let path = self.config_path()?;
        Ok(self.config.get_or_try_init(|| load_config(path))?.as_ref())
    }

    pub fn ledger_path(&self) -> anyhow::Result<(PathBuf, LedgerPathSource)> {
        resolve_ledger_path(self.cli.ledger.as_deref(), self.config()?)
    }

    /// Display timezone from the config, UTC when unset.
    pub fn timezone(&self) -> anyhow::Result<Tz> {
        match self.config()?.and_then(|c| c.ui.timezone.as_deref()) {
            Some(name) => parse_timezone(name),
            None => Ok(Tz::UTC),
        }
    }

    /// Build the UI context for a command with the given output flags.
    pub fn ui(&self, output: &OutputArgs) -> anyhow::Result<UiContext> {
        let format = output
            .format
            .as_deref()
            .map(TextFormat::from_str)
            .transpose()?;
        if output.json && format.is_some() {
            return Err(CliError::invalid_input("--format cannot be used with --json").into());
        }
        Ok(
            UiContext::from_env(output.json, format, self.cli.no_color, self.cli.ascii)
                .with_timezone(self.timezone()?),
        )
    }

    /// UI context for commands without output flags.
    pub fn default_ui(&self) -> anyhow::Result<UiContext> {
        self.ui(&OutputArgs::default())
    }

    /// Open the library session on the resolved ledger path.
    ///
    /// A missing ledger is created with the default policy. If that first
    /// save fails, the warning is printed and the session is still returned.
    pub fn open_library(&self, ui: &UiContext) -> anyhow::Result<CliLibrary> {
        let (path, _) = self.ledger_path()?;
        tracing::debug!(path = %path.display(), "opening ledger");
        let opened = Library::open(JsonFileStore::new(&path))?;
        let library = self.finish(ui, opened, "ledger created in memory only");
        if library.ledger().needs_repair() && !self.quiet() {
            ui::print_warning(
                ui,
                "ledger violates its invariants; changes are refused until it is repaired",
            );
        }
        Ok(library)
    }

    /// Unwrap an applied change, printing its save warning if any.
    pub fn finish<T>(&self, ui: &UiContext, applied: Applied<T>, what: &str) -> T {
        if let Some(err) = &applied.save_error {
            ui::print_warning(ui, &format!("{}; not saved: {}", what, err));
        }
        applied.value
    }
}

pub fn parse_timezone(name: &str) -> anyhow::Result<Tz> {
    name.parse::<Tz>().map_err(|_| {
        CliError::invalid_input(format!("Unknown timezone: {} (use an IANA name)", name)).into()
    })
}
