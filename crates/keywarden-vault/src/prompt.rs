// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master-passphrase acquisition via TTY prompt or environment variable.

use keywarden_core::KeywardenError;
use secrecy::SecretString;

/// Environment variable consulted before prompting. Intended for scripted
/// and headless use.
pub const PASSPHRASE_ENV_VAR: &str = "KEYWARDEN_PASSPHRASE";

/// Get the master passphrase from the environment or an interactive prompt.
pub fn get_passphrase() -> Result<SecretString, KeywardenError> {
    if let Some(passphrase) = from_env() {
        return Ok(passphrase);
    }
    if is_tty() {
        let passphrase = read_tty("Master passphrase: ")?;
        if passphrase.is_empty() {
            return Err(KeywardenError::Config("empty passphrase not allowed".to_string()));
        }
        return Ok(SecretString::from(passphrase));
    }
    Err(KeywardenError::Config(format!(
        "no passphrase provided; set {PASSPHRASE_ENV_VAR} or run interactively"
    )))
}

/// Get a new master passphrase, prompting twice for confirmation.
///
/// The environment variable path skips confirmation.
pub fn get_passphrase_with_confirm() -> Result<SecretString, KeywardenError> {
    if let Some(passphrase) = from_env() {
        return Ok(passphrase);
    }
    if is_tty() {
        let first = read_tty("New master passphrase: ")?;
        let second = read_tty("Confirm master passphrase: ")?;
        if first != second {
            return Err(KeywardenError::Config("passphrases do not match".to_string()));
        }
        if first.is_empty() {
            return Err(KeywardenError::Config("empty passphrase not allowed".to_string()));
        }
        return Ok(SecretString::from(first));
    }
    Err(KeywardenError::Config(format!(
        "no passphrase provided; set {PASSPHRASE_ENV_VAR} or run interactively"
    )))
}

fn from_env() -> Option<SecretString> {
    match std::env::var(PASSPHRASE_ENV_VAR) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdin())
}

fn read_tty(prompt: &str) -> Result<String, KeywardenError> {
    eprint!("{prompt}");
    rpassword::read_password()
        .map_err(|e| KeywardenError::Config(format!("failed to read passphrase: {e}")))
}
