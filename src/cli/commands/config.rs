use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::config::Config;

use super::{join_rest, usage};

const USAGE: &str = "config show
config set <key> <value>
config backup [note]
config backups
config restore <backup|n>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((&"show", [])) | None => show(context),
        Some((&"set", [key, rest @ ..])) if !rest.is_empty() => {
            set(context, key, &join_rest(rest))
        }
        Some((&"backup", rest)) => {
            let note = join_rest(rest);
            let name = context
                .config_manager
                .backup(&context.config, (!note.is_empty()).then_some(note.as_str()))?;
            io::print_success(format!("Configuration backup `{}` created.", name));
            Ok(())
        }
        Some((&"backups", [])) => {
            let backups = context.config_manager.list_backups()?;
            output_section("Configuration backups");
            if backups.is_empty() {
                io::print_info("  (none)");
            }
            for (idx, name) in backups.iter().enumerate() {
                io::print_info(format!("  {:>2}. {}", idx + 1, name));
            }
            Ok(())
        }
        Some((&"restore", [backup])) => restore(context, backup),
        _ => Err(usage(USAGE)),
    }
}

fn show(context: &mut ShellContext) -> CommandResult {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!("  locale            : {}", config.locale));
    io::print_info(format!("  currency          : {}", config.currency));
    io::print_info(format!("  date_format       : {}", config.date_format.name()));
    io::print_info(format!("  company.name      : {}", config.company.name));
    io::print_info(format!("  company.address   : {}", config.company.address));
    io::print_info(format!(
        "  company.phones    : {}",
        config.company.phones.join(", ")
    ));
    io::print_info(format!("  backup_retention  : {}", config.backup_retention));
    io::print_info(format!(
        "  default terms     : {} clauses",
        config.default_terms.len()
    ));
    io::print_info(format!(
        "  last ledger       : {}",
        config.last_opened_ledger.as_deref().unwrap_or("-")
    ));
    io::print_info(format!(
        "  sample amount     : {}",
        context.format_amount(1_234_567.0)
    ));
    io::print_info(format!("  file              : {}", context.config_manager.path().display()));
    Ok(())
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    context.config.set(key, value)?;
    context.persist_config()?;
    io::print_success(format!("`{}` updated.", key));
    if key.eq_ignore_ascii_case("backup_retention") {
        io::print_info("Retention applies from the next start.");
    }
    Ok(())
}

fn restore(context: &mut ShellContext, backup: &str) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    let name = match backup.parse::<usize>() {
        Ok(position) if position >= 1 && position <= backups.len() => backups[position - 1].clone(),
        _ => backup.to_string(),
    };
    if !context.confirm(&format!("Replace the configuration with `{}`?", name))? {
        return Ok(());
    }
    let restored: Config = context.config_manager.restore(&name)?;
    context.config = restored;
    io::print_success(format!("Configuration restored from `{}`.", name));
    Ok(())
}
