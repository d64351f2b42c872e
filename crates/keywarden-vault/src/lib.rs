// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase-derived authenticated encryption for the Keywarden vault.
//!
//! Blobs are AES-256-GCM, laid out as a 12-byte random nonce followed by
//! ciphertext and tag. The key is derived deterministically from the
//! passphrase alone -- no stored salt -- so the same passphrase always opens
//! the same blob. Two derivation schemes exist: the current PBKDF2-based one
//! (used for every new encryption) and a legacy single-MD5 one kept solely to
//! read vaults written by old versions. Blobs carry no format marker;
//! [`envelope::decrypt_with_fallback`] tries the schemes in order.

pub mod authfile;
pub mod crypto;
pub mod envelope;
pub mod kdf;
pub mod prompt;
pub mod records;

pub use authfile::AuthData;
pub use envelope::{decrypt_with_fallback, encrypt};
pub use prompt::{get_passphrase, get_passphrase_with_confirm};
pub use records::{ServiceData, ServiceRecord};
