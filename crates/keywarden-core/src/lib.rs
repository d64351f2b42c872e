// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Keywarden credential vault.
//!
//! This crate provides the error taxonomy and layered configuration shared by
//! the vault (crypto) and remote (sync) crates. It contains no I/O of its own
//! beyond reading config files.

pub mod config;
pub mod error;

// Re-export key items at crate root for ergonomic imports.
pub use config::{KeywardenConfig, LocalConfig, RemoteConfig};
pub use error::KeywardenError;
