use uuid::Uuid;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section, Align};
use crate::cli::registry::CommandEntry;
use crate::core::filters::{distinct_categories, DateRange, EntryFilter};
use crate::core::services::{EntryService, ProjectService};
use crate::domain::{EntryForm, EntryKind, EntryPatch};
use crate::domain::numeric::parse_non_negative;

use super::{parse_date, usage, ParsedArgs};

const USAGE: &str = "entry add <income|expense> <amount> [--category c] [--description d] [--date YYYY-MM-DD] [--project p]
entry list [--search text] [--type income|expense] [--category c] [--range all|today|week|month] [--project p]
entry edit <id> [--type t] [--amount n] [--category c] [--description d] [--date YYYY-MM-DD]
entry remove <id>
entry voice <transcript> [--project p]
entry categories [--project p]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "entry",
        "Record, browse and edit income and expense entries",
        USAGE,
        cmd_entry,
    )]
}

fn cmd_entry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((sub, rest)) = args.split_first() else {
        return Err(usage(USAGE));
    };
    let parsed = ParsedArgs::parse(rest)?;
    match *sub {
        "add" => add_entry(context, parsed),
        "list" => list_entries(context, parsed),
        "edit" => edit_entry(context, parsed),
        "remove" => remove_entry(context, parsed),
        "voice" => voice_entry(context, parsed),
        "categories" => list_categories(context, parsed),
        _ => Err(usage(USAGE)),
    }
}

/// `--project` when given, otherwise the selected project (`None`).
fn project_option(context: &ShellContext, parsed: &ParsedArgs) -> Result<Option<Uuid>, CommandError> {
    match parsed.option("project") {
        Some(key) => ProjectService::resolve(context.ledger()?, key)
            .map(|project| Some(project.id))
            .ok_or_else(|| CommandError::InvalidArguments(format!("No project named `{}`.", key))),
        None => Ok(None),
    }
}

fn listed_project(context: &ShellContext, parsed: &ParsedArgs) -> Result<Uuid, CommandError> {
    match project_option(context, parsed)? {
        Some(id) => Ok(id),
        None => context.selected_project_id(),
    }
}

fn add_entry(context: &mut ShellContext, parsed: ParsedArgs) -> CommandResult {
    let parsed = parsed.only(&["category", "description", "date", "project"])?;
    let [kind, amount] = parsed.positional.as_slice() else {
        return Err(usage("entry add <income|expense> <amount> [--category c] [--description d] [--date YYYY-MM-DD]"));
    };
    let form = EntryForm {
        kind: kind.parse::<EntryKind>()?,
        amount: amount.to_string(),
        category: parsed.option("category").unwrap_or_default().to_string(),
        description: parsed.option("description").unwrap_or_default().to_string(),
        date: parsed.option("date").map(parse_date).transpose()?,
    };
    let project = project_option(context, &parsed)?;
    let today = context.today();
    let session = context.session.clone();
    let id = EntryService::add(context.ledger_mut()?, session.as_ref(), project, form, today)?;
    io::print_success(format!("Entry {} recorded.", short_id(id)));
    Ok(())
}

fn voice_entry(context: &mut ShellContext, parsed: ParsedArgs) -> CommandResult {
    let parsed = parsed.only(&["project"])?;
    let transcript = parsed.positional.join(" ");
    if transcript.trim().is_empty() {
        return Err(usage("entry voice <transcript>"));
    }
    let project = project_option(context, &parsed)?;
    let today = context.today();
    let session = context.session.clone();
    let (id, patch) = EntryService::add_from_transcript(
        context.ledger_mut()?,
        session.as_ref(),
        project,
        &transcript,
        today,
    )?;
    io::print_info(format!(
        "Heard: type {}, amount {}, category {}, description {}",
        patch
            .kind
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "-".into()),
        patch
            .amount
            .map(|amount| context.format_amount(amount))
            .unwrap_or_else(|| "-".into()),
        patch.category.as_deref().unwrap_or("-"),
        patch.description.as_deref().unwrap_or("-"),
    ));
    io::print_success(format!("Entry {} recorded.", short_id(id)));
    Ok(())
}

fn list_entries(context: &mut ShellContext, parsed: ParsedArgs) -> CommandResult {
    let parsed = parsed.only(&["search", "type", "category", "range", "project"])?;
    let project_id = listed_project(context, &parsed)?;
    let mut filter = EntryFilter::default();
    if let Some(term) = parsed.option("search") {
        filter = filter.with_search(term);
    }
    if let Some(kind) = parsed.option("type") {
        filter = filter.with_kind(kind.parse::<EntryKind>()?);
    }
    if let Some(category) = parsed.option("category") {
        filter = filter.with_category(category);
    }
    if let Some(range) = parsed.option("range") {
        filter = filter.with_range(range.parse::<DateRange>()?);
    }

    let ledger = context.ledger()?;
    let entries = EntryService::filtered(ledger, project_id, &filter, context.today());
    let project_name = ledger
        .project(project_id)
        .map(|project| project.name.as_str())
        .unwrap_or_default();
    output_section(format!("Entries of `{}` ({})", project_name, filter.range));
    if entries.is_empty() {
        io::print_info("No matching entries.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                short_id(entry.id),
                context.format_date(entry.date),
                entry.kind.to_string(),
                context.format_amount(entry.amount),
                entry.category.clone(),
                entry.description.clone(),
            ]
        })
        .collect();
    io::print_info(render_table(
        &[
            ("Id", Align::Left),
            ("Date", Align::Left),
            ("Type", Align::Left),
            ("Amount", Align::Right),
            ("Category", Align::Left),
            ("Description", Align::Left),
        ],
        &rows,
    ));
    Ok(())
}

fn edit_entry(context: &mut ShellContext, parsed: ParsedArgs) -> CommandResult {
    let parsed = parsed.only(&["type", "amount", "category", "description", "date"])?;
    let [key] = parsed.positional.as_slice() else {
        return Err(usage("entry edit <id> [--type t] [--amount n] [--category c] [--description d] [--date YYYY-MM-DD]"));
    };
    let patch = EntryPatch {
        kind: parsed
            .option("type")
            .map(str::parse::<EntryKind>)
            .transpose()?,
        amount: parsed
            .option("amount")
            .map(|raw| parse_non_negative("amount", raw))
            .transpose()?,
        category: parsed.option("category").map(str::to_string),
        description: parsed.option("description").map(str::to_string),
        date: parsed.option("date").map(parse_date).transpose()?,
    };
    if patch.is_empty() {
        return Err(CommandError::InvalidArguments(
            "Nothing to change; pass at least one option.".into(),
        ));
    }
    let ledger = context.ledger_mut()?;
    let id = EntryService::resolve_id(ledger, key)?;
    EntryService::update(ledger, id, &patch)?;
    io::print_success(format!("Entry {} updated.", short_id(id)));
    Ok(())
}

fn remove_entry(context: &mut ShellContext, parsed: ParsedArgs) -> CommandResult {
    let parsed = parsed.only(&[])?;
    let [key] = parsed.positional.as_slice() else {
        return Err(usage("entry remove <id>"));
    };
    let id = EntryService::resolve_id(context.ledger()?, key)?;
    if !context.confirm(&format!("Delete entry {}?", short_id(id)))? {
        return Ok(());
    }
    let removed = EntryService::remove(context.ledger_mut()?, id)?;
    io::print_success(format!(
        "Removed {} of {}.",
        removed.kind,
        context.format_amount(removed.amount)
    ));
    Ok(())
}

fn list_categories(context: &mut ShellContext, parsed: ParsedArgs) -> CommandResult {
    let parsed = parsed.only(&["project"])?;
    let project_id = listed_project(context, &parsed)?;
    let categories = distinct_categories(context.ledger()?.entries_for(project_id));
    output_section("Categories");
    if categories.is_empty() {
        io::print_info("  (none)");
    }
    for category in categories {
        io::print_info(format!("  {}", category));
    }
    Ok(())
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}
