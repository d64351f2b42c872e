// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local encrypted storage of the remote-account credentials.
//!
//! The WebDAV username and password are kept in a small file (default
//! `~/.keywarden_auth`) encrypted with the same envelope as the vault itself,
//! under the master passphrase. The file is written with owner-only
//! permissions and refused on load if group or other can access it.

use std::fs;
use std::io::Write;
use std::path::Path;

use keywarden_core::KeywardenError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::envelope;

/// Remote-account credentials for the WebDAV endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthData {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AuthData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthData")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Whether an auth file is present at `path`.
pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Encrypt and write the credentials with mode 0600.
pub fn save(path: &Path, auth: &AuthData, passphrase: &SecretString) -> Result<(), KeywardenError> {
    let json = serde_json::to_vec(auth).map_err(|e| KeywardenError::Serialization(e.to_string()))?;
    let blob = envelope::encrypt(&json, passphrase)?;
    write_owner_only(path, &blob)?;
    info!(path = %path.display(), "auth data saved");
    Ok(())
}

/// Read, decrypt, and parse the credentials.
///
/// Fails before touching the contents if the file is readable by group or
/// other. An `Authentication` error means the master passphrase does not
/// match the one the file was written with.
pub fn load(path: &Path, passphrase: &SecretString) -> Result<AuthData, KeywardenError> {
    check_owner_only(path)?;
    let blob = fs::read(path)?;
    let json = envelope::decrypt_with_fallback(&blob, passphrase)?;
    serde_json::from_slice(&json).map_err(|e| KeywardenError::Serialization(e.to_string()))
}

#[cfg(unix)]
fn write_owner_only(path: &Path, data: &[u8]) -> Result<(), KeywardenError> {
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(data)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_owner_only(path: &Path, data: &[u8]) -> Result<(), KeywardenError> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    Ok(())
}

#[cfg(unix)]
fn check_owner_only(path: &Path) -> Result<(), KeywardenError> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(path)?.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(KeywardenError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!(
                "auth data file {} is accessible to other users or groups (mode {:o})",
                path.display(),
                mode & 0o777
            ),
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_owner_only(_path: &Path) -> Result<(), KeywardenError> {
    Ok(())
}
