//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log-level` nor `LENDING_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber on stderr, keeping stdout for command output.
pub fn init(filter: Option<&str>) {
    let (env_filter, rejected) = match filter.map(EnvFilter::try_new) {
        Some(Ok(env_filter)) => (env_filter, None),
        Some(Err(err)) => (EnvFilter::new(DEFAULT_FILTER), Some(err)),
        None => (EnvFilter::new(DEFAULT_FILTER), None),
    };

    // Fails only when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Some(err) = rejected {
        tracing::warn!(filter = filter.unwrap_or_default(), error = %err, "ignoring invalid log filter");
    }
}
