use crate::cli::io;
use crate::cli::output::{render_table, section as output_section, Align};
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Commands");
    let rows: Vec<Vec<String>> = registry
        .list()
        .map(|entry| {
            vec![
                entry.name.to_string(),
                entry.subcommands().join(" "),
                entry.description.to_string(),
            ]
        })
        .collect();
    io::print_info(render_table(
        &[
            ("Command", Align::Left),
            ("Subcommands", Align::Left),
            ("What it does", Align::Left),
        ],
        &rows,
    ));
    io::print_info("`help <command> [subcommand]` shows the exact forms.");
}

/// Prints the usage forms of `entry`, narrowed to `sub` when it matches any.
pub fn print_command(entry: &CommandEntry, sub: Option<&str>) {
    let narrowed = entry.usage_for(sub);
    let (title, lines) = match sub {
        Some(sub) if !narrowed.is_empty() => (format!("{} {}", entry.name, sub), narrowed),
        _ => (entry.name.to_string(), entry.usage_for(None)),
    };
    output_section(title);
    io::print_info(format!("  {}", entry.description));
    for line in lines {
        io::print_info(format!("    {}", line));
    }
}
