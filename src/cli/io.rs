use std::io::IsTerminal;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::core::CommandError;

pub use crate::cli::output::{
    error as print_error, hint as print_hint, info as print_info, success as print_success,
    warning as print_warning,
};

/// Asks a yes/no question. Without a terminal on stdin the answer is
/// `default` and the question is echoed as a hint.
pub fn confirm_action(prompt: &str, default: bool) -> Result<bool, CommandError> {
    if !std::io::stdin().is_terminal() {
        print_hint(format!("{prompt} (assuming {})", if default { "yes" } else { "no" }));
        return Ok(default);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}
