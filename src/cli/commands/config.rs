use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::MonthBucketing;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change settings",
        "config [show | currency <symbol> | bucketing <month|year-month>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            show_config(context);
            Ok(())
        }
        ["currency", symbol] => {
            let symbol = symbol.trim();
            if symbol.is_empty() {
                return Err(CommandError::InvalidArguments(
                    "currency symbol must not be empty".into(),
                ));
            }
            context.config.currency_symbol = symbol.to_string();
            context.presenter.set_currency(symbol);
            save_config(context)?;
            output::success(format!("Currency symbol set to {symbol}"));
            Ok(())
        }
        ["bucketing", mode] => {
            let bucketing = MonthBucketing::parse(mode).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown bucketing `{mode}`; expected `month` or `year-month`"
                ))
            })?;
            context.config.month_bucketing = bucketing;
            context.engine.set_month_bucketing(bucketing);
            save_config(context)?;
            output::success(format!("Month bucketing set to {}", bucketing.label()));
            context
                .presenter
                .print_chart("By month", &context.engine.monthly_totals());
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [show | currency <symbol> | bucketing <month|year-month>]".into(),
        )),
    }
}

fn show_config(context: &ShellContext) {
    output::section("Configuration");
    output::line(format!("  currency:  {}", context.config.currency_symbol));
    output::line(format!(
        "  bucketing: {}",
        context.config.month_bucketing.label()
    ));
    output::line(format!("  key:       {}", context.config.storage_key));
    output::line(format!(
        "  file:      {}",
        context.config_manager.path().display()
    ));
}

fn save_config(context: &ShellContext) -> CommandResult {
    context.config_manager.save(&context.config)?;
    tracing::debug!(path = %context.config_manager.path().display(), "configuration saved");
    Ok(())
}
