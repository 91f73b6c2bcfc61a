use std::path::Path;

use crate::billing::{
    render_estimate, BillCalculator, BillDraft, FinalizedBill, ItemField, LineItem, PaymentTerm,
};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section, separator, Align};
use crate::cli::registry::CommandEntry;
use crate::core::services::BillingService;
use crate::currency::format_number;
use crate::domain::numeric::{parse_non_negative, parse_percentage};
use crate::errors::ValidationError;

use super::{join_rest, parse_date, parse_index, usage};

const USAGE: &str = "bill new
bill show [number|id]
bill set number|customer|date <value>
bill item add [particular]
bill item set <n> <particular|description|unit|width|height|price> <value>
bill item remove <n>
bill term add <stage> <percent>
bill term token <stage> <amount>
bill term stage|percent|amount <n> <value>
bill term remove <n>
bill clause add <text>
bill clause set <n> <text>
bill clause remove <n>
bill finalize
bill submit
bill discard
bill list
bill export <number|id> [path]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "bill",
        "Edit, finalize, submit and export interior estimates",
        USAGE,
        cmd_bill,
    )]
}

fn cmd_bill(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((&"new", [])) => new_draft(context),
        Some((&"show", [])) => show_draft(context),
        Some((&"show", [key])) => show_stored(context, key),
        Some((&"set", [field, rest @ ..])) if !rest.is_empty() => {
            set_header(context, field, &join_rest(rest))
        }
        Some((&"item", rest)) => edit_items(context, rest),
        Some((&"term", rest)) => edit_terms(context, rest),
        Some((&"clause", rest)) => edit_clauses(context, rest),
        Some((&"finalize", [])) => finalize(context),
        Some((&"submit", [])) => submit(context),
        Some((&"discard", [])) => discard(context),
        Some((&"list", [])) => list_bills(context),
        Some((&"export", [key])) => export(context, key, None),
        Some((&"export", [key, path])) => export(context, key, Some(Path::new(path))),
        _ => Err(usage(USAGE)),
    }
}

/// Reports positions the way the user typed them.
fn one_based(err: ValidationError) -> CommandError {
    match err {
        ValidationError::IndexOutOfRange { kind, index } => {
            CommandError::InvalidArguments(format!("There is no {} #{}.", kind, index + 1))
        }
        other => other.into(),
    }
}

fn new_draft(context: &mut ShellContext) -> CommandResult {
    if context.draft.is_some() && !context.confirm("Discard the bill being edited?")? {
        return Ok(());
    }
    context.draft = Some(context.config.new_draft(context.today()));
    io::print_success("New bill draft started.");
    io::print_info("Set `bill set number <n>` and `bill set customer <name>` before submitting.");
    Ok(())
}

fn discard(context: &mut ShellContext) -> CommandResult {
    context.draft()?;
    if !context.confirm("Discard the bill being edited?")? {
        return Ok(());
    }
    context.draft = None;
    io::print_success("Bill draft discarded.");
    Ok(())
}

fn set_header(context: &mut ShellContext, field: &str, value: &str) -> CommandResult {
    let draft = context.draft_mut()?;
    match field.to_ascii_lowercase().as_str() {
        "number" | "bill_number" => draft.set_bill_number(value)?,
        "customer" | "customer_name" => draft.set_customer_name(value)?,
        "date" | "bill_date" => draft.set_bill_date(parse_date(value)?),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown bill field `{}` (expected number, customer or date)",
                other
            )))
        }
    }
    io::print_success(format!("Bill {} updated.", field));
    Ok(())
}

fn edit_items(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let locale = context.config.locale_config();
    let draft = context.draft_mut()?;
    match args {
        ["add", rest @ ..] => {
            let particular = join_rest(rest);
            let index = if particular.is_empty() {
                draft.add_item()
            } else {
                let mut item = LineItem::default();
                item.particular = particular;
                draft.push_item(item)
            };
            io::print_success(format!("Item #{} added.", index + 1));
        }
        ["set", index, field, rest @ ..] if !rest.is_empty() => {
            let index = parse_index(index)?;
            let field = field.parse::<ItemField>()?;
            draft
                .set_item_field(index, field, &join_rest(rest))
                .map_err(one_based)?;
            io::print_success(format!(
                "Item #{} {} updated; grand total now {}.",
                index + 1,
                field.name(),
                format_number(&locale, draft.grand_total(), 2)
            ));
        }
        ["remove", index] => {
            let index = parse_index(index)?;
            let removed = draft.remove_item(index).map_err(one_based)?;
            io::print_success(format!("Item `{}` removed.", removed.particular));
        }
        _ => return Err(usage("bill item add|set|remove ...")),
    }
    Ok(())
}

fn edit_terms(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = context.draft_mut()?;
    match args {
        ["add", stage, percent] => {
            let term = PaymentTerm::percent(*stage, parse_percentage(percent)?)?;
            let index = draft.push_term(term);
            io::print_success(format!("Stage #{} added.", index + 1));
        }
        ["token", stage, amount] => {
            let term = PaymentTerm::token(*stage, parse_non_negative("amount", amount)?)?;
            let index = draft.push_term(term);
            io::print_success(format!("Token stage #{} added.", index + 1));
        }
        ["stage", index, rest @ ..] if !rest.is_empty() => {
            draft
                .set_term_stage(parse_index(index)?, &join_rest(rest))
                .map_err(one_based)?;
            io::print_success("Stage renamed.");
        }
        ["percent", index, value] => {
            draft
                .set_term_percentage(parse_index(index)?, value)
                .map_err(one_based)?;
            io::print_success("Stage percentage updated.");
        }
        ["amount", index, value] => {
            draft
                .set_token_amount(parse_index(index)?, value)
                .map_err(one_based)?;
            io::print_success("Token amount updated.");
        }
        ["remove", index] => {
            let removed = draft.remove_term(parse_index(index)?).map_err(one_based)?;
            io::print_success(format!("Stage `{}` removed.", removed.stage));
        }
        _ => return Err(usage("bill term add|token|stage|percent|amount|remove ...")),
    }
    Ok(())
}

fn edit_clauses(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = context.draft_mut()?;
    match args {
        ["add", rest @ ..] if !rest.is_empty() => {
            let index = draft.add_clause(&join_rest(rest))?;
            io::print_success(format!("Clause #{} added.", index + 1));
        }
        ["set", index, rest @ ..] if !rest.is_empty() => {
            draft
                .set_clause(parse_index(index)?, &join_rest(rest))
                .map_err(one_based)?;
            io::print_success("Clause updated.");
        }
        ["remove", index] => {
            draft.remove_clause(parse_index(index)?).map_err(one_based)?;
            io::print_success("Clause removed.");
        }
        _ => return Err(usage("bill clause add|set|remove ...")),
    }
    Ok(())
}

fn show_draft(context: &mut ShellContext) -> CommandResult {
    let draft = context.draft()?;
    output_section("Bill draft");
    io::print_info(format!(
        "  Bill No : {}",
        or_placeholder(&draft.bill_number)
    ));
    io::print_info(format!("  Date    : {}", context.format_date(draft.bill_date)));
    io::print_info(format!(
        "  Customer: {}",
        or_placeholder(&draft.customer_name)
    ));
    print_items(context, draft.items());
    print_terms(context, draft.payment_terms());
    io::print_info(format!(
        "  Grand total: {}",
        context.format_amount(draft.grand_total())
    ));
    io::print_info(format!(
        "  {} terms & conditions clauses.",
        draft.terms_and_conditions.len()
    ));
    if let Err(err) = draft.validate_for_submission() {
        io::print_warning(format!("Not ready to submit: {}", err));
    }
    Ok(())
}

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not set)"
    } else {
        value
    }
}

fn print_items(context: &ShellContext, items: &[LineItem]) {
    let locale = context.config.locale_config();
    let rows: Vec<Vec<String>> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let size = match item.computed_area() {
                Some(area) => format!(
                    "{} x {} = {}",
                    format_number(&locale, item.width(), 2),
                    format_number(&locale, item.height(), 2),
                    format_number(&locale, area, 2)
                ),
                None => "-".into(),
            };
            vec![
                (idx + 1).to_string(),
                or_placeholder(&item.particular).to_string(),
                item.unit().to_string(),
                size,
                context.format_amount(item.price_per_unit()),
                context.format_amount(item.total()),
            ]
        })
        .collect();
    separator();
    io::print_info(render_table(
        &[
            ("#", Align::Right),
            ("Particular", Align::Left),
            ("Unit", Align::Left),
            ("Size (Sft)", Align::Left),
            ("Price", Align::Right),
            ("Total", Align::Right),
        ],
        &rows,
    ));
}

fn print_terms(context: &ShellContext, terms: &[PaymentTerm]) {
    let locale = context.config.locale_config();
    let rows: Vec<Vec<String>> = terms
        .iter()
        .enumerate()
        .map(|(idx, term)| {
            let share = if term.is_token() {
                "Token".to_string()
            } else {
                format!("{}%", format_number(&locale, term.percentage(), 0))
            };
            vec![
                (idx + 1).to_string(),
                term.stage.clone(),
                share,
                context.format_amount(term.amount()),
            ]
        })
        .collect();
    separator();
    io::print_info(render_table(
        &[
            ("#", Align::Right),
            ("Stage", Align::Left),
            ("Share", Align::Right),
            ("Amount", Align::Right),
        ],
        &rows,
    ));
}

fn print_finalized(context: &ShellContext, bill: &FinalizedBill) {
    io::print_info(format!(
        "  Grand total     : {}",
        context.format_amount(bill.grand_total())
    ));
    io::print_info(format!(
        "  Percent stages  : {}%",
        format_number(&context.config.locale_config(), bill.percentage_total(), 0)
    ));
    io::print_info(format!(
        "  Scheduled total : {}",
        context.format_amount(bill.scheduled_total())
    ));
}

fn finalize(context: &mut ShellContext) -> CommandResult {
    let draft = context.draft()?;
    let bill = BillCalculator::finalize_bill(draft)?;
    output_section("Finalized amounts");
    print_items(context, bill.items());
    print_terms(context, bill.payment_terms());
    separator();
    print_finalized(context, &bill);
    if (bill.percentage_total() - 100.0).abs() > f64::EPSILON {
        io::print_warning("Percentage stages do not add up to 100%.");
    }
    Ok(())
}

fn submit(context: &mut ShellContext) -> CommandResult {
    context.ledger()?;
    let draft: BillDraft = context.draft.take().ok_or_else(|| {
        CommandError::InvalidArguments("No bill draft open. Use `bill new` first.".into())
    })?;
    let session = context.session.clone();
    let ledger = context.ledger_mut()?;
    match BillingService::submit(ledger, session.as_ref(), draft) {
        Ok(receipt) => {
            io::print_success(format!(
                "Bill {} submitted for {} (id {}).",
                receipt.bill.bill_number(),
                context.format_amount(receipt.bill.grand_total()),
                receipt.id
            ));
            io::print_info("Save the ledger to keep it: `ledger save`.");
            Ok(())
        }
        Err((draft, err)) => {
            context.draft = Some(draft);
            io::print_warning("Bill not submitted; the draft is still open for editing.");
            Err(err.into())
        }
    }
}

fn list_bills(context: &mut ShellContext) -> CommandResult {
    let ledger = context.ledger()?;
    let bills = BillingService::list(ledger);
    output_section("Submitted bills");
    if bills.is_empty() {
        io::print_info("No bills submitted yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = bills
        .iter()
        .map(|stored| {
            vec![
                stored.bill.bill_number().to_string(),
                context.format_date(stored.bill.bill_date()),
                stored.bill.customer_name().to_string(),
                context.format_amount(stored.bill.grand_total()),
                stored.author.clone(),
            ]
        })
        .collect();
    io::print_info(render_table(
        &[
            ("Bill No", Align::Left),
            ("Date", Align::Left),
            ("Customer", Align::Left),
            ("Grand total", Align::Right),
            ("Author", Align::Left),
        ],
        &rows,
    ));
    Ok(())
}

fn show_stored(context: &mut ShellContext, key: &str) -> CommandResult {
    let ledger = context.ledger()?;
    let stored = BillingService::find(ledger, key)?;
    let text = render_estimate(
        &stored.bill,
        &context.config.locale_config(),
        &context.config.currency_code(),
    );
    io::print_info(text.trim_end());
    Ok(())
}

fn export(context: &mut ShellContext, key: &str, target: Option<&Path>) -> CommandResult {
    let ledger = context.ledger()?;
    let path = BillingService::export(ledger, &context.config, key, target)?;
    io::print_success(format!("Estimate written to {}.", path.display()));
    Ok(())
}
