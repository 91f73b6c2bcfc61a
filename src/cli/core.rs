//! Shell context, dispatch, and the error types shared by command handlers.

use std::{collections::BTreeMap, io, path::PathBuf};

use chrono::{Local, NaiveDate};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    billing::BillDraft,
    config::{Config, ConfigManager},
    core::services::ServiceError,
    currency::{format_currency_value, format_date},
    domain::{Project, Session},
    errors::{TallyError, ValidationError},
    ledger::Ledger,
    storage::{ledger_warnings, JsonStorage, StorageBackend},
    utils::paths::PathResolver,
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failures that stop the shell itself rather than a single command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TallyError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Ledger not loaded. Use `ledger new` or `ledger load` first.")]
    LedgerNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] TallyError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::Core(TallyError::Validation(err))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Readline(inner) => CommandError::Readline(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

/// Everything a command handler can touch: persistence, configuration, the
/// open ledger, the acting session and the bill being edited.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub storage: JsonStorage,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub ledger: Option<Ledger>,
    pub ledger_name: Option<String>,
    pub session: Option<Session>,
    pub draft: Option<BillDraft>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new(Some(base), Some(config.backup_retention))?;

        let mut app = ShellContext {
            mode,
            registry,
            storage,
            config_manager,
            config,
            ledger: None,
            ledger_name: None,
            session: None,
            draft: None,
            last_command: None,
            running: true,
        };
        app.auto_load_last();
        Ok(app)
    }

    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(name) = self.config.last_opened_ledger.clone() else {
            return;
        };
        match self.storage.load(&name) {
            Ok(ledger) => {
                self.report_load_warnings(&ledger);
                self.set_ledger(ledger, Some(name.clone()));
                cli_io::print_success(format!("Automatically loaded last ledger `{}`.", name));
            }
            Err(err) => {
                tracing::warn!(ledger = %name, error = %err, "could not reopen last ledger");
            }
        }
    }

    pub(crate) fn completion_table(&self) -> BTreeMap<String, Vec<String>> {
        self.registry.completion_table()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        let ledger = self.ledger_name.as_deref().unwrap_or("no ledger");
        let project = self
            .ledger
            .as_ref()
            .and_then(Ledger::selected_project)
            .map(|project| format!(":{}", project.name))
            .unwrap_or_default();
        let draft = if self.draft.is_some() { " *bill" } else { "" };
        format!("tally [{ledger}{project}{draft}]> ")
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?", true)?)
    }

    /// Asks before a destructive step. Script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::LedgerNotLoaded => {
                cli_io::print_error("Ledger not loaded. Use `ledger new` or `ledger load` first.");
                cli_io::print_hint("Try `ledger new Household` to get started.");
                Ok(())
            }
            CommandError::Core(TallyError::Validation(ValidationError::MissingSession)) => {
                cli_io::print_error("No active session.");
                cli_io::print_hint("Use `session login <user>` first.");
                Ok(())
            }
            other => {
                cli_io::print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub(crate) fn set_ledger(&mut self, ledger: Ledger, name: Option<String>) {
        self.ledger = Some(ledger);
        self.ledger_name = name;
    }

    pub(crate) fn report_load_warnings(&self, ledger: &Ledger) {
        for warning in ledger_warnings(ledger) {
            cli_io::print_warning(warning);
        }
    }

    pub(crate) fn ledger(&self) -> Result<&Ledger, CommandError> {
        self.ledger.as_ref().ok_or(CommandError::LedgerNotLoaded)
    }

    pub(crate) fn ledger_mut(&mut self) -> Result<&mut Ledger, CommandError> {
        self.ledger.as_mut().ok_or(CommandError::LedgerNotLoaded)
    }

    pub(crate) fn session(&self) -> Result<&Session, CommandError> {
        Ok(Session::require(self.session.as_ref())?)
    }

    /// The project commands act on when none is named explicitly.
    pub(crate) fn selected_project(&self) -> Result<&Project, CommandError> {
        self.ledger()?
            .selected_project()
            .ok_or_else(|| ValidationError::MissingProject.into())
    }

    pub(crate) fn selected_project_id(&self) -> Result<Uuid, CommandError> {
        self.selected_project().map(|project| project.id)
    }

    pub(crate) fn draft_mut(&mut self) -> Result<&mut BillDraft, CommandError> {
        self.draft.as_mut().ok_or_else(|| {
            CommandError::InvalidArguments("No bill draft open. Use `bill new` first.".into())
        })
    }

    pub(crate) fn draft(&self) -> Result<&BillDraft, CommandError> {
        self.draft.as_ref().ok_or_else(|| {
            CommandError::InvalidArguments("No bill draft open. Use `bill new` first.".into())
        })
    }

    pub(crate) fn format_amount(&self, amount: f64) -> String {
        format_currency_value(
            amount,
            &self.config.currency_code(),
            &self.config.locale_config(),
        )
    }

    pub(crate) fn format_date(&self, date: NaiveDate) -> String {
        format_date(&self.config.locale_config(), date)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn update_last_opened(&mut self, name: Option<&str>) -> CommandResult {
        self.config.last_opened_ledger = name.map(str::to_string);
        self.persist_config()
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }
}
