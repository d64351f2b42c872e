// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase-level encryption with ordered key-scheme fallback.
//!
//! Blobs carry no marker saying which derivation scheme produced their key,
//! so decryption walks [`kdf::KEY_SCHEMES`] in order, one attempt per scheme.
//! Encryption always uses the first (current) scheme, which is what upgrades
//! a legacy blob on its next save: decrypt via fallback, re-encrypt current.

use keywarden_core::KeywardenError;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::crypto;
use crate::kdf;

/// Encrypt plaintext under the current key scheme.
pub fn encrypt(plaintext: &[u8], passphrase: &SecretString) -> Result<Vec<u8>, KeywardenError> {
    let key = kdf::derive_current(passphrase.expose_secret());
    crypto::seal(&key, plaintext)
}

/// Decrypt a blob, trying each key scheme in declared order.
///
/// Exactly one attempt per scheme; when the last scheme fails authentication
/// the error propagates so the caller can re-prompt for a passphrase. The
/// caller is not told which scheme succeeded.
pub fn decrypt_with_fallback(
    blob: &[u8],
    passphrase: &SecretString,
) -> Result<Zeroizing<Vec<u8>>, KeywardenError> {
    for (attempt, scheme) in kdf::KEY_SCHEMES.iter().enumerate() {
        let key = (scheme.derive)(passphrase.expose_secret());
        match crypto::open(&key, blob) {
            Ok(plaintext) => {
                if attempt > 0 {
                    warn!(
                        scheme = scheme.label,
                        "decrypted with a legacy key scheme; the next save re-encrypts with the current one"
                    );
                }
                return Ok(plaintext);
            }
            Err(err) if err.is_authentication() => {
                debug!(scheme = scheme.label, "key scheme rejected the blob");
            }
            Err(err) => return Err(err),
        }
    }
    Err(KeywardenError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::{derive_legacy, derive_current};

    fn pass(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn current_blob_roundtrips_through_fallback() {
        let passphrase = pass("master");
        let blob = encrypt(b"vault payload", &passphrase).unwrap();
        let plaintext = decrypt_with_fallback(&blob, &passphrase).unwrap();
        assert_eq!(&plaintext[..], b"vault payload");
    }

    #[test]
    fn legacy_blob_is_still_recoverable() {
        // A blob written by an old version: sealed under the legacy MD5 key.
        let legacy_key = derive_legacy("master");
        let blob = crypto::seal(&legacy_key, b"old vault payload").unwrap();

        let plaintext = decrypt_with_fallback(&blob, &pass("master")).unwrap();
        assert_eq!(&plaintext[..], b"old vault payload");
    }

    #[test]
    fn resaving_a_legacy_blob_upgrades_the_scheme() {
        let legacy_key = derive_legacy("master");
        let old_blob = crypto::seal(&legacy_key, b"payload").unwrap();

        let passphrase = pass("master");
        let plaintext = decrypt_with_fallback(&old_blob, &passphrase).unwrap();
        let new_blob = encrypt(&plaintext, &passphrase).unwrap();

        // The re-saved blob opens under the current key alone.
        let current_key = derive_current("master");
        assert_eq!(&crypto::open(&current_key, &new_blob).unwrap()[..], b"payload");
        // And no longer under the legacy key.
        assert!(crypto::open(&legacy_key, &new_blob).is_err());
    }

    #[test]
    fn wrong_passphrase_fails_after_both_schemes() {
        let blob = encrypt(b"payload", &pass("right")).unwrap();
        let result = decrypt_with_fallback(&blob, &pass("wrong"));
        assert!(matches!(result, Err(KeywardenError::Authentication)));
    }

    #[test]
    fn truncated_blob_fails_authentication() {
        let result = decrypt_with_fallback(&[0x01, 0x02], &pass("any"));
        assert!(matches!(result, Err(KeywardenError::Authentication)));
    }
}
