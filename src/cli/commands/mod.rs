pub mod bill;
pub mod config;
pub mod entry;
pub mod ledger;
pub mod project;
pub mod session;
pub mod summary;
pub mod system;

use chrono::NaiveDate;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(session::definitions())
        .chain(ledger::definitions())
        .chain(project::definitions())
        .chain(entry::definitions())
        .chain(summary::definitions())
        .chain(bill::definitions())
        .chain(config::definitions())
    {
        registry.register(entry);
    }
}

/// Positional arguments plus `--flag value` pairs, in the order given.
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    pub options: Vec<(&'a str, &'a str)>,
}

impl<'a> ParsedArgs<'a> {
    pub fn parse(args: &[&'a str]) -> Result<Self, CommandError> {
        let mut positional = Vec::new();
        let mut options = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(flag) = arg.strip_prefix("--") {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`--{flag}` needs a value"))
                })?;
                options.push((flag, *value));
            } else {
                positional.push(*arg);
            }
        }
        Ok(Self {
            positional,
            options,
        })
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(flag, _)| flag.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    /// Rejects flags outside `allowed`.
    pub fn only(self, allowed: &[&str]) -> Result<Self, CommandError> {
        if let Some((flag, _)) = self
            .options
            .iter()
            .find(|(flag, _)| !allowed.iter().any(|name| name.eq_ignore_ascii_case(flag)))
        {
            return Err(CommandError::InvalidArguments(format!(
                "unknown option `--{flag}`"
            )));
        }
        Ok(self)
    }
}

pub(crate) fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {text}"))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a date (use YYYY-MM-DD)", raw.trim()))
    })
}

/// Converts a 1-based index typed by the user into a vector position.
pub(crate) fn parse_index(raw: &str) -> Result<usize, CommandError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value >= 1 => Ok(value - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{}` is not a position (numbering starts at 1)",
            raw.trim()
        ))),
    }
}

pub(crate) fn join_rest(args: &[&str]) -> String {
    args.join(" ").trim().to_string()
}
