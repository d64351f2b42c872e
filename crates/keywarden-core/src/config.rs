// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration using Figment.
//!
//! Merge order (later overrides earlier): compiled defaults,
//! `/etc/keywarden/keywarden.toml`, `~/.config/keywarden/keywarden.toml`,
//! `./keywarden.toml`, then `KEYWARDEN_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::KeywardenError;

/// Top-level Keywarden configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeywardenConfig {
    /// Remote WebDAV endpoint settings.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Local file locations.
    #[serde(default)]
    pub local: LocalConfig,
}

/// Remote WebDAV endpoint settings.
///
/// The vault lives at `<base_url>/<root_dir>/<db_file>`, with backups on the
/// same base name suffixed `.1` through `.5`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// WebDAV server base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Remote collection holding the vault blob.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,

    /// Primary blob name inside the collection.
    #[serde(default = "default_db_file")]
    pub db_file: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Logical remote path of the primary blob, relative to the base URL.
    pub fn primary_path(&self) -> String {
        format!("{}/{}", self.root_dir, self.db_file)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            root_dir: default_root_dir(),
            db_file: default_db_file(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://webdav.yandex.ru".to_string()
}

fn default_root_dir() -> String {
    ".keywarden".to_string()
}

fn default_db_file() -> String {
    "db.bin".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Local file locations.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    /// Encrypted WebDAV credentials file. Defaults to `~/.keywarden_auth`.
    #[serde(default)]
    pub auth_file: Option<PathBuf>,
}

impl LocalConfig {
    /// Resolve the auth file path, falling back to `~/.keywarden_auth`.
    pub fn auth_file_path(&self) -> Result<PathBuf, KeywardenError> {
        if let Some(ref path) = self.auth_file {
            return Ok(path.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(".keywarden_auth"))
            .ok_or_else(|| KeywardenError::Config("cannot determine home directory".to_string()))
    }
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<KeywardenConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeywardenConfig::default()))
        .merge(Toml::file("/etc/keywarden/keywarden.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("keywarden/keywarden.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("keywarden.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file or env lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<KeywardenConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeywardenConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Environment variable provider using explicit `map()` for section-to-dot
/// mapping. `KEYWARDEN_REMOTE_BASE_URL` must map to `remote.base_url`, not
/// `remote.base.url`, so `Env::split("_")` cannot be used.
fn env_provider() -> Env {
    Env::prefixed("KEYWARDEN_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("remote_", "remote.", 1)
            .replacen("local_", "local.", 1);
        mapped.into()
    })
}
