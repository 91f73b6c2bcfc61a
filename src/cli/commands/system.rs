use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::ledger::ledger::CURRENT_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "List commands, or the forms of one command",
            "help [command] [subcommand]",
            cmd_help,
        ),
        CommandEntry::new(
            "version",
            "Show build, schema and data folder details",
            "version",
            cmd_version,
        ),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Tally Core {}", meta.version));
    io::print_info(format!("  Build       : {}", meta.summary()));
    io::print_info(format!("  Ledger file : schema v{}", CURRENT_SCHEMA_VERSION));
    io::print_info(format!("  Data folder : {}", context.storage.base_dir().display()));
    io::print_info(format!(
        "  Money       : {} ({})",
        context.config.currency, context.config.locale
    ));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => help::print_overview(&context.registry),
        [name, rest @ ..] => match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry, rest.first().copied()),
            None => context.suggest_command(name),
        },
    }
    Ok(())
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.draft.is_some() {
        io::print_warning("The open bill draft is not saved anywhere and will be lost.");
    }
    Err(CommandError::ExitRequested)
}
