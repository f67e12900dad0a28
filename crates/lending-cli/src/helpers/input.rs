//! Interactive prompts for fields omitted on the command line.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use crate::errors::CliError;
use crate::ui::UiContext;

use super::parsing::require_text;

/// Use `value` if given, otherwise prompt for it when a terminal is attached.
///
/// With `--no-input` or without a TTY a missing value is an input error
/// naming the flag to pass.
pub fn require_field(
    ui: &UiContext,
    label: &str,
    flag: &str,
    value: Option<&str>,
    no_input: bool,
) -> anyhow::Result<String> {
    if let Some(value) = value {
        return require_text(label, value);
    }
    if no_input || !ui.is_interactive() {
        return Err(CliError::invalid_input(format!("{} is required (pass {})", label, flag)).into());
    }
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", label.to_lowercase(), e))?;
    require_text(label, &answer)
}
