use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::domain::Session;

use super::{usage, ParsedArgs};

const USAGE: &str = "session login <user> [display name] [--token t]
session logout
session show";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "session",
        "Open or close the local session entries are recorded under",
        USAGE,
        cmd_session,
    )]
}

fn cmd_session(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((&"login", rest)) => {
            let parsed = ParsedArgs::parse(rest)?.only(&["token"])?;
            let Some((user, display)) = parsed.positional.split_first() else {
                return Err(usage(USAGE));
            };
            let mut session = Session::new(*user)?;
            if !display.is_empty() {
                session = session.with_display_name(display.join(" "));
            }
            if let Some(token) = parsed.option("token") {
                session = session.with_token(token);
            }
            io::print_success(format!("Logged in as {}.", session.label()));
            context.session = Some(session);
            Ok(())
        }
        Some((&"logout", [])) => {
            match context.session.take() {
                Some(session) => io::print_success(format!("Logged out {}.", session.label())),
                None => io::print_info("No active session."),
            }
            Ok(())
        }
        Some((&"show", [])) | None => {
            match &context.session {
                Some(session) => io::print_info(format!(
                    "Session: {} (user `{}`, since {})",
                    session.label(),
                    session.user_id,
                    session.started_at.format("%Y-%m-%d %H:%M UTC")
                )),
                None => io::print_info("No active session."),
            }
            Ok(())
        }
        _ => Err(usage(USAGE)),
    }
}
