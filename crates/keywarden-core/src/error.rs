// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keywarden credential vault.
//!
//! The four variants named by the sync protocol are `NotFound` (recoverable:
//! the vault does not exist yet), `Authentication` (recoverable: re-prompt
//! for a passphrase), `Transport` (fatal to the current call, safe to retry
//! the whole operation), and `RotationAborted` (fatal to the current save;
//! the remote primary is untouched). Nothing is retried or swallowed inside
//! the library; callers decide.

use thiserror::Error;

/// The primary error type used across all Keywarden crates.
#[derive(Debug, Error)]
pub enum KeywardenError {
    /// Remote object absent. On the primary blob this means "first run,
    /// vault does not exist yet" and is converted to a non-error by `load`.
    #[error("remote object not found: {path}")]
    NotFound { path: String },

    /// Decryption tag mismatch under every key scheme tried -- wrong
    /// passphrase, corrupted blob, or truncated input.
    #[error("decryption failed under all key schemes -- wrong passphrase or corrupted data")]
    Authentication,

    /// Network or HTTP failure talking to the remote store.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A rename mid-way through the backup chain failed. The primary blob
    /// has not been touched; the save must not proceed.
    #[error("backup rotation aborted moving {from} -> {to}: {source}")]
    RotationAborted {
        from: String,
        to: String,
        source: Box<KeywardenError>,
    },

    /// Configuration errors (invalid TOML, missing fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Cryptographic primitive failures outside of tag verification
    /// (key setup, CSPRNG exhaustion). These are not recoverable by retry.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Local filesystem errors (auth data file, permissions).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Record or auth-data payloads that fail to (de)serialize.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl KeywardenError {
    /// True for the "object absent" classification that `load` and the
    /// rotator treat as a non-error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, KeywardenError::NotFound { .. })
    }

    /// True when decryption failed authentication and a different passphrase
    /// may succeed.
    pub fn is_authentication(&self) -> bool {
        matches!(self, KeywardenError::Authentication)
    }

    /// Shorthand for a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        KeywardenError::Transport {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        let err = KeywardenError::NotFound {
            path: ".keywarden/db.bin".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_authentication());

        let err = KeywardenError::transport("connection refused");
        assert!(!err.is_not_found());
    }

    #[test]
    fn rotation_aborted_names_both_edges() {
        let err = KeywardenError::RotationAborted {
            from: "db.bin.3".into(),
            to: "db.bin.4".into(),
            source: Box::new(KeywardenError::transport("timeout")),
        };
        let msg = err.to_string();
        assert!(msg.contains("db.bin.3"));
        assert!(msg.contains("db.bin.4"));
    }

    #[test]
    fn io_errors_convert() {
        fn read_missing() -> Result<Vec<u8>, KeywardenError> {
            Ok(std::fs::read("/nonexistent/keywarden-test")?)
        }
        assert!(matches!(read_missing(), Err(KeywardenError::Io(_))));
    }
}
