//! Path resolution for config and ledger files.

use std::path::{Path, PathBuf};

use crate::config::{default_config_path, default_ledger_path, read_config, LendingConfig};

/// Where the ledger path came from, reported by `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerPathSource {
    Flag,
    Config,
    Default,
}

impl LedgerPathSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Config => "config",
            Self::Default => "default",
        }
    }
}

/// Resolve the config file path, checking `LENDING_CONFIG` first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("LENDING_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file if it exists.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<LendingConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }
    read_config(config_path).map(Some)
}

/// Resolve the ledger file path.
///
/// Order: `--ledger` (or `LENDING_PATH`), the config file, then the XDG data
/// directory.
pub fn resolve_ledger_path(
    flag: Option<&str>,
    config: Option<&LendingConfig>,
) -> anyhow::Result<(PathBuf, LedgerPathSource)> {
    if let Some(path) = flag.filter(|p| !p.trim().is_empty()) {
        return Ok((PathBuf::from(path), LedgerPathSource::Flag));
    }
    if let Some(config) = config {
        if !config.ledger.path.trim().is_empty() {
            return Ok((
                PathBuf::from(&config.ledger.path),
                LedgerPathSource::Config,
            ));
        }
    }
    Ok((default_ledger_path()?, LedgerPathSource::Default))
}
