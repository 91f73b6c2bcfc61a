use chrono::Datelike;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section, Align};
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;
use crate::currency::month_label;

use super::usage;

const USAGE: &str = "summary [balance]
summary monthly [year]
summary yearly
summary overall
summary categories
summary income-vs-expense
summary monthly-expenses";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Balances and breakdowns for the selected project",
        USAGE,
        cmd_summary,
    )]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["balance"] => balance(context),
        ["monthly"] => {
            let year = context.today().year();
            monthly(context, year)
        }
        ["monthly", year] => {
            let year = year.parse::<i32>().map_err(|_| {
                CommandError::InvalidArguments(format!("`{}` is not a year", year))
            })?;
            monthly(context, year)
        }
        ["yearly"] => yearly(context),
        ["overall"] => overall(context),
        ["categories"] => categories(context),
        ["income-vs-expense"] => income_vs_expense(context),
        ["monthly-expenses"] => monthly_expenses(context),
        _ => Err(usage(USAGE)),
    }
}

fn money_headers(first: &'static str) -> [(&'static str, Align); 4] {
    [
        (first, Align::Left),
        ("Income", Align::Right),
        ("Expenses", Align::Right),
        ("Balance", Align::Right),
    ]
}

fn balance(context: &mut ShellContext) -> CommandResult {
    let project = context.selected_project()?;
    let totals = SummaryService::totals(context.ledger()?, project.id);
    output_section(format!("Balance of `{}`", project.name));
    io::print_info(format!("  Income   : {}", context.format_amount(totals.total_income)));
    io::print_info(format!("  Expenses : {}", context.format_amount(totals.total_expenses)));
    io::print_info(format!("  Balance  : {}", context.format_amount(totals.net_balance)));
    Ok(())
}

fn monthly(context: &mut ShellContext, year: i32) -> CommandResult {
    let project_id = context.selected_project_id()?;
    let rows: Vec<Vec<String>> = SummaryService::monthly(context.ledger()?, project_id, year)
        .into_iter()
        .map(|row| {
            vec![
                row.label.to_string(),
                context.format_amount(row.income),
                context.format_amount(row.expenses),
                context.format_amount(row.balance),
            ]
        })
        .collect();
    output_section(format!("Monthly balance {}", year));
    if rows.is_empty() {
        io::print_info(format!("No entries in {}.", year));
        return Ok(());
    }
    io::print_info(render_table(&money_headers("Month"), &rows));
    Ok(())
}

fn yearly(context: &mut ShellContext) -> CommandResult {
    let project_id = context.selected_project_id()?;
    let rows: Vec<Vec<String>> = SummaryService::yearly(context.ledger()?, project_id)
        .into_iter()
        .map(|row| {
            vec![
                row.year.to_string(),
                context.format_amount(row.income),
                context.format_amount(row.expenses),
                context.format_amount(row.balance),
            ]
        })
        .collect();
    output_section("Yearly balance");
    if rows.is_empty() {
        io::print_info("No entries yet.");
        return Ok(());
    }
    io::print_info(render_table(&money_headers("Year"), &rows));
    Ok(())
}

fn overall(context: &mut ShellContext) -> CommandResult {
    let owner = context.session()?.user_id.clone();
    let summary = SummaryService::overall(context.ledger()?, &owner);
    output_section("Overall summary");
    let mut rows: Vec<Vec<String>> = summary
        .project_wise
        .iter()
        .map(|row| {
            vec![
                row.project_name.clone(),
                context.format_amount(row.income),
                context.format_amount(row.expenses),
                context.format_amount(row.balance),
            ]
        })
        .collect();
    rows.push(vec![
        "Total".into(),
        context.format_amount(summary.overall.total_income),
        context.format_amount(summary.overall.total_expenses),
        context.format_amount(summary.overall.net_balance),
    ]);
    io::print_info(render_table(&money_headers("Project"), &rows));
    Ok(())
}

fn categories(context: &mut ShellContext) -> CommandResult {
    let project_id = context.selected_project_id()?;
    let totals = SummaryService::category_expenses(context.ledger()?, project_id);
    output_section("Expenses by category");
    if totals.is_empty() {
        io::print_info("No expenses yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = totals
        .iter()
        .map(|row| vec![row.category.clone(), context.format_amount(row.amount)])
        .collect();
    io::print_info(render_table(
        &[("Category", Align::Left), ("Amount", Align::Right)],
        &rows,
    ));
    Ok(())
}

fn income_vs_expense(context: &mut ShellContext) -> CommandResult {
    let project_id = context.selected_project_id()?;
    let pair = SummaryService::income_vs_expense(context.ledger()?, project_id);
    output_section("Income vs expense");
    io::print_info(format!("  Income  : {}", context.format_amount(pair.income)));
    io::print_info(format!("  Expense : {}", context.format_amount(pair.expense)));
    Ok(())
}

fn monthly_expenses(context: &mut ShellContext) -> CommandResult {
    let project_id = context.selected_project_id()?;
    let series = SummaryService::monthly_expenses(context.ledger()?, project_id);
    output_section("Monthly expenses");
    if series.is_empty() {
        io::print_info("No expenses yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = series
        .iter()
        .map(|row| {
            vec![
                format!("{} {}", month_label(row.month), row.year),
                context.format_amount(row.amount),
            ]
        })
        .collect();
    io::print_info(render_table(
        &[("Month", Align::Left), ("Amount", Align::Right)],
        &rows,
    ));
    Ok(())
}
