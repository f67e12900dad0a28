use lending_core::LoanPolicy;

use crate::app::AppContext;
use crate::cli::{ConfigSetArgs, OutputArgs};
use crate::errors::CliError;
use crate::helpers::parse_money;
use crate::output::{policy_json, print_json};
use crate::ui::{format_money, header, kv, print, receipt};

pub fn handle_show(app: &AppContext<'_>, args: &OutputArgs) -> anyhow::Result<()> {
    let ui = app.ui(args)?;
    let (path, source) = app.ledger_path()?;
    let library = app.open_library(&ui)?;
    let policy = library.ledger().policy();
    let path = path.display().to_string();

    if ui.mode.is_json() {
        return print_json(&policy_json(&policy, &path, source.as_str()));
    }
    if !app.quiet() {
        print(&ui, &header(&ui, "config", None));
    }
    print(&ui, &kv(&ui, "Ledger", &path));
    print(&ui, &kv(&ui, "Ledger Source", source.as_str()));
    print(&ui, &kv(&ui, "Loan Days", &policy.loan_days.to_string()));
    print(&ui, &kv(&ui, "Penalty Rate", &format_money(policy.penalty_rate)));
    print(&ui, &kv(&ui, "Timezone", ui.timezone.name()));
    Ok(())
}

/// Change the loan policy. Both values are validated before either is
/// applied, so a bad rate never leaves a half-updated policy behind.
pub fn handle_set(app: &AppContext<'_>, args: &ConfigSetArgs) -> anyhow::Result<()> {
    if args.loan_days.is_none() && args.penalty_rate.is_none() {
        return Err(
            CliError::invalid_input("Nothing to change (pass --loan-days or --penalty-rate)")
                .into(),
        );
    }
    let days = args
        .loan_days
        .map(LoanPolicy::validate_loan_days)
        .transpose()?;
    let rate = args
        .penalty_rate
        .as_deref()
        .map(parse_money)
        .transpose()?
        .map(LoanPolicy::validate_penalty_rate)
        .transpose()?;

    let ui = app.default_ui()?;
    let mut library = app.open_library(&ui)?;
    if let Some(days) = days {
        let applied = library.set_loan_duration(i64::from(days))?;
        app.finish(&ui, applied, "loan duration changed");
    }
    if let Some(rate) = rate {
        let applied = library.set_penalty_rate(rate)?;
        app.finish(&ui, applied, "penalty rate changed");
    }

    if !app.quiet() {
        let policy = library.ledger().policy();
        print(
            &ui,
            &receipt(
                &ui,
                "Updated loan policy",
                &[
                    ("Loan Days", policy.loan_days.to_string()),
                    ("Penalty Rate", format_money(policy.penalty_rate)),
                ],
            ),
        );
    }
    Ok(())
}
