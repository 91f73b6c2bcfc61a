use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section, Align};
use crate::cli::registry::CommandEntry;
use crate::core::services::{ProjectService, SummaryService};

use super::{join_rest, usage};

const USAGE: &str = "project add <name>
project list
project select <name|id>
project remove <name|id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "project",
        "Manage the projects entries are filed under",
        USAGE,
        cmd_project,
    )]
}

fn cmd_project(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((&"add", rest)) if !rest.is_empty() => add_project(context, &join_rest(rest)),
        Some((&"list", [])) => list_projects(context),
        Some((&"select", rest)) if !rest.is_empty() => select_project(context, &join_rest(rest)),
        Some((&"remove", rest)) if !rest.is_empty() => remove_project(context, &join_rest(rest)),
        _ => Err(usage(USAGE)),
    }
}

fn add_project(context: &mut ShellContext, name: &str) -> CommandResult {
    let session = context.session()?.clone();
    let ledger = context.ledger_mut()?;
    let id = ProjectService::add(ledger, &session, name)?;
    if ledger.selected_project.is_none() {
        ProjectService::select(ledger, id)?;
    }
    io::print_success(format!("Project `{}` created.", name));
    Ok(())
}

fn list_projects(context: &mut ShellContext) -> CommandResult {
    let owner = context.session()?.user_id.clone();
    let ledger = context.ledger()?;
    let projects = ProjectService::list(ledger, &owner);
    output_section("Projects");
    if projects.is_empty() {
        io::print_info("No projects yet. Use `project add <name>`.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|project| {
            let totals = SummaryService::totals(ledger, project.id);
            let marker = if ledger.selected_project == Some(project.id) {
                "*"
            } else {
                ""
            };
            vec![
                marker.to_string(),
                project.name.clone(),
                ledger.entries_for(project.id).count().to_string(),
                context.format_amount(totals.net_balance),
            ]
        })
        .collect();
    io::print_info(render_table(
        &[
            ("", Align::Left),
            ("Name", Align::Left),
            ("Entries", Align::Right),
            ("Balance", Align::Right),
        ],
        &rows,
    ));
    Ok(())
}

fn find_project(context: &ShellContext, key: &str) -> Result<uuid::Uuid, CommandError> {
    let ledger = context.ledger()?;
    ProjectService::resolve(ledger, key)
        .map(|project| project.id)
        .ok_or_else(|| CommandError::InvalidArguments(format!("No project named `{}`.", key)))
}

fn select_project(context: &mut ShellContext, key: &str) -> CommandResult {
    let id = find_project(context, key)?;
    let ledger = context.ledger_mut()?;
    ProjectService::select(ledger, id)?;
    let name = ledger.project(id).map(|p| p.name.clone()).unwrap_or_default();
    io::print_success(format!("Project `{}` selected.", name));
    Ok(())
}

fn remove_project(context: &mut ShellContext, key: &str) -> CommandResult {
    let id = find_project(context, key)?;
    let entries = context.ledger()?.entries_for(id).count();
    let prompt = format!("Delete project `{}` and its {} entries?", key, entries);
    if !context.confirm(&prompt)? {
        return Ok(());
    }
    let removed = ProjectService::remove(context.ledger_mut()?, id)?;
    io::print_success(format!(
        "Project `{}` removed with {} entries.",
        removed.name, entries
    ));
    Ok(())
}
