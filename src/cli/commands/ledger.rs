use std::path::Path;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::ledger::Ledger;
use crate::storage::StorageBackend;
use crate::utils::fs::parse_backup_timestamp;

use super::{join_rest, usage};

const USAGE: &str = "ledger new <name>
ledger load <name|path.json>
ledger save [name|path.json]
ledger list
ledger backup [note]
ledger backups
ledger restore <backup>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "ledger",
        "Create, open, save and back up ledgers",
        USAGE,
        cmd_ledger,
    )]
}

fn cmd_ledger(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((&"new", rest)) if !rest.is_empty() => new_ledger(context, &join_rest(rest)),
        Some((&"load", [target])) => load_ledger(context, target),
        Some((&"save", [])) => save_named(context, None),
        Some((&"save", [target])) => {
            if is_path(target) {
                let ledger = context.ledger()?;
                context.storage.save_to_path(ledger, Path::new(target))?;
                io::print_success(format!("Ledger saved to {}.", target));
                Ok(())
            } else {
                save_named(context, Some(*target))
            }
        }
        Some((&"list", [])) => list_ledgers(context),
        Some((&"backup", rest)) => backup_ledger(context, &join_rest(rest)),
        Some((&"backups", [])) => list_backups(context),
        Some((&"restore", [backup])) => restore_ledger(context, backup),
        _ => Err(usage(USAGE)),
    }
}

fn is_path(target: &str) -> bool {
    target.ends_with(".json") || target.contains(std::path::MAIN_SEPARATOR) || target.contains('/')
}

fn new_ledger(context: &mut ShellContext, name: &str) -> CommandResult {
    if context.ledger.is_some() && !context.confirm("Discard the open ledger?")? {
        return Ok(());
    }
    context.set_ledger(Ledger::new(name), Some(name.to_string()));
    context.draft = None;
    tracing::info!(ledger = %name, "ledger created");
    io::print_success(format!("New ledger `{}` created.", name));
    Ok(())
}

fn load_ledger(context: &mut ShellContext, target: &str) -> CommandResult {
    let (ledger, name) = if is_path(target) {
        let ledger = context.storage.load_from_path(Path::new(target))?;
        (ledger, None)
    } else {
        (context.storage.load(target)?, Some(target.to_string()))
    };
    context.report_load_warnings(&ledger);
    io::print_success(format!(
        "Ledger `{}` loaded ({} projects, {} entries, {} bills).",
        ledger.name,
        ledger.projects.len(),
        ledger.entries.len(),
        ledger.bills.len()
    ));
    let display_name = name.clone().unwrap_or_else(|| ledger.name.clone());
    context.set_ledger(ledger, Some(display_name));
    context.draft = None;
    if let Some(name) = name {
        context.update_last_opened(Some(&name))?;
    }
    Ok(())
}

fn save_named(context: &mut ShellContext, name: Option<&str>) -> CommandResult {
    let name = match name {
        Some(name) => name.to_string(),
        None => context.ledger_name.clone().ok_or_else(|| {
            CommandError::InvalidArguments("Name the ledger: `ledger save <name>`".into())
        })?,
    };
    let ledger = context.ledger()?;
    context.storage.save(ledger, &name)?;
    io::print_success(format!("Ledger saved as `{}`.", name));
    context.ledger_name = Some(name.clone());
    context.update_last_opened(Some(&name))
}

fn current_name(context: &ShellContext) -> Result<String, CommandError> {
    context.ledger()?;
    context.ledger_name.clone().ok_or_else(|| {
        CommandError::InvalidArguments("Save the ledger under a name first.".into())
    })
}

fn list_ledgers(context: &mut ShellContext) -> CommandResult {
    let names = context.storage.list_ledgers()?;
    output_section("Saved ledgers");
    if names.is_empty() {
        io::print_info("  (none)");
    }
    for name in names {
        io::print_info(format!("  {}", name));
    }
    Ok(())
}

fn backup_ledger(context: &mut ShellContext, note: &str) -> CommandResult {
    let name = current_name(context)?;
    let note = (!note.is_empty()).then_some(note);
    let ledger = context.ledger()?;
    let file = context.storage.backup(ledger, &name, note)?;
    io::print_success(format!("Backup `{}` created.", file));
    Ok(())
}

fn list_backups(context: &mut ShellContext) -> CommandResult {
    let name = current_name(context)?;
    let backups = context.storage.list_backups(&name)?;
    output_section(format!("Backups of `{}`", name));
    if backups.is_empty() {
        io::print_info("  (none)");
    }
    for (idx, backup) in backups.iter().enumerate() {
        let when = parse_backup_timestamp(backup)
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown time".into());
        io::print_info(format!("  {:>2}. {}  ({})", idx + 1, backup, when));
    }
    Ok(())
}

fn restore_ledger(context: &mut ShellContext, backup: &str) -> CommandResult {
    let name = current_name(context)?;
    let backups = context.storage.list_backups(&name)?;
    let file = match backup.parse::<usize>() {
        Ok(position) if position >= 1 && position <= backups.len() => backups[position - 1].clone(),
        _ => backup.to_string(),
    };
    if !context.confirm(&format!("Replace `{}` with backup `{}`?", name, file))? {
        return Ok(());
    }
    let ledger = context.storage.restore(&name, &file)?;
    context.report_load_warnings(&ledger);
    context.set_ledger(ledger, Some(name));
    context.draft = None;
    io::print_success(format!("Restored backup `{}`.", file));
    Ok(())
}
