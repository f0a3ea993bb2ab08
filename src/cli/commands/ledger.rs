use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::TransactionId;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Record an income (positive) or expense (negative)",
            "add <description> <amount>",
            cmd_add,
        ),
        CommandEntry::new(
            "remove",
            "Delete a transaction by id",
            "remove <id>",
            cmd_remove,
        )
        .with_aliases(&["delete"]),
        CommandEntry::new("list", "List all transactions", "list", cmd_list),
        CommandEntry::new(
            "summary",
            "Show balance, income and expense",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "categories",
            "Chart totals by description",
            "categories",
            cmd_categories,
        ),
        CommandEntry::new("months", "Chart totals by month", "months", cmd_months),
        CommandEntry::new("show", "Redraw the full ledger view", "show", cmd_show),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((amount, description)) = args.split_last().filter(|(_, rest)| !rest.is_empty())
    else {
        return Err(CommandError::InvalidArguments(
            "usage: add <description> <amount>".into(),
        ));
    };
    let amount = parse_amount(amount)?;
    let text = description.join(" ");

    let txn = context.engine.add(&text, amount)?;
    output::success(format!("Added #{} {}", txn.id, txn.text));
    context.after_mutation();
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::InvalidArguments("usage: remove <id>".into()));
    };
    let id = parse_id(raw)?;

    if context.engine.remove(id) {
        output::success(format!("Removed #{id}"));
        context.after_mutation();
    } else {
        output::warning(format!("No transaction with id {id}."));
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context
        .presenter
        .print_transactions(context.engine.transactions());
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.presenter.print_summary(&context.engine.summary());
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context
        .presenter
        .print_chart("By category", &context.engine.category_totals());
    Ok(())
}

fn cmd_months(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context
        .presenter
        .print_chart("By month", &context.engine.monthly_totals());
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.render();
    Ok(())
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))
}

fn parse_id(raw: &str) -> Result<TransactionId, CommandError> {
    raw.trim()
        .trim_start_matches('#')
        .parse::<TransactionId>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid id")))
}
