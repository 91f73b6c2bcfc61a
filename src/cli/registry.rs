use std::collections::{BTreeMap, HashMap};

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// A top-level shell command. `usage` holds one line per form, each starting
/// with the command name.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }

    /// Literal second words of the usage lines, with `a|b` alternatives split.
    pub fn subcommands(&self) -> Vec<&'static str> {
        let mut words: Vec<&'static str> = Vec::new();
        for line in self.usage.lines() {
            let Some(word) = line.split_whitespace().nth(1) else {
                continue;
            };
            if word.starts_with(['<', '[', '-']) {
                continue;
            }
            for alt in word.split('|') {
                if !words.contains(&alt) {
                    words.push(alt);
                }
            }
        }
        words
    }

    /// Usage lines for one subcommand, or all of them.
    pub fn usage_for(&self, sub: Option<&str>) -> Vec<&'static str> {
        let lines = self.usage.lines().map(str::trim);
        match sub {
            None => lines.collect(),
            Some(sub) => lines
                .filter(|line| {
                    line.split_whitespace()
                        .nth(1)
                        .map(|word| word.split('|').any(|alt| alt.eq_ignore_ascii_case(sub)))
                        .unwrap_or(false)
                })
                .collect(),
        }
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`; a second registration under the same name replaces the
    /// first but keeps its position in listings.
    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> + '_ {
        self.order.iter().filter_map(|name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    /// Command names mapped to their subcommands, for line completion.
    pub fn completion_table(&self) -> BTreeMap<String, Vec<String>> {
        self.list()
            .map(|entry| {
                let subs = entry.subcommands().into_iter().map(str::to_string).collect();
                (entry.name.to_string(), subs)
            })
            .collect()
    }
}
