// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open over the vault blob layout.
//!
//! A blob is `nonce (12 bytes) || ciphertext || tag (16 bytes)` with no
//! associated data. Every call to [`seal`] draws a fresh 96-bit nonce from
//! the system CSPRNG; nonce reuse under the same key would be catastrophic
//! for GCM.

use keywarden_core::KeywardenError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::kdf::{DerivedKey, KEY_LEN};

/// GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt plaintext, returning the self-contained blob.
pub fn seal(key: &DerivedKey, plaintext: &[u8]) -> Result<Vec<u8>, KeywardenError> {
    let aead_key = gcm_key(key)?;

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| KeywardenError::Crypto("failed to generate random nonce".to_string()))?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = plaintext.to_vec();
    aead_key
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| KeywardenError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + in_out.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&in_out);
    Ok(blob)
}

/// Decrypt a blob produced by [`seal`].
///
/// Returns [`KeywardenError::Authentication`] if the tag does not verify
/// (wrong key, corrupted blob, wrong key scheme) or if the blob is shorter
/// than the nonce.
pub fn open(key: &DerivedKey, blob: &[u8]) -> Result<Zeroizing<Vec<u8>>, KeywardenError> {
    if blob.len() < NONCE_LEN {
        return Err(KeywardenError::Authentication);
    }
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);

    let aead_key = gcm_key(key)?;
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| KeywardenError::Authentication)?;

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = aead_key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| KeywardenError::Authentication)?
        .len();

    in_out.truncate(plaintext_len);
    Ok(in_out)
}

// A key length ring rejects here is a build misconfiguration, not a runtime
// condition; KEY_LEN is pinned to what AES_256_GCM expects.
fn gcm_key(key: &DerivedKey) -> Result<LessSafeKey, KeywardenError> {
    debug_assert_eq!(KEY_LEN, AES_256_GCM.key_len());
    let unbound = UnboundKey::new(&AES_256_GCM, key.as_slice())
        .map_err(|_| KeywardenError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}
