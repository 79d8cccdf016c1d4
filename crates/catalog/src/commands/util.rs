//! Shared helpers for command handlers.

use std::io::{self, BufRead, IsTerminal};

use secrecy::SecretString;

use crate::error::CliError;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::validation("interactive", format!("prompt failed: {e}"))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Prompt for a value that must not echo.
pub fn prompt_secret(label: &str) -> Result<SecretString, CliError> {
    let value = rpassword::prompt_password(format!("{label}: ")).map_err(prompt_err)?;
    Ok(SecretString::from(value))
}

/// First line of stdin, without the trailing newline.
pub fn read_secret_line() -> Result<SecretString, CliError> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']).to_owned();
    Ok(SecretString::from(trimmed))
}

pub fn prompt_text(label: &str) -> Result<String, CliError> {
    dialoguer::Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .map_err(prompt_err)
}
