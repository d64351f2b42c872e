// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic key derivation from a passphrase.
//!
//! Both schemes produce 32 bytes of lowercase hex characters used directly as
//! an AES-256 key. The parameters of the current scheme (MD5 salt, 10
//! PBKDF2-HMAC-SHA1 iterations, 4096-byte stretch, final MD5) look odd by
//! modern standards but are fixed by the on-disk format of existing vaults
//! and must not change. New schemes are added by appending to [`KEY_SCHEMES`].

use std::num::NonZeroU32;

use md5::{Digest, Md5};
use ring::pbkdf2;
use zeroize::Zeroizing;

/// Key length in bytes: 16 MD5 output bytes, hex-encoded.
pub const KEY_LEN: usize = 32;

/// PBKDF2 stretch output length in bytes.
const STRETCH_LEN: usize = 4096;

/// PBKDF2 iteration count.
const PBKDF2_ITERATIONS: u32 = 10;

/// A derived AES-256 key, zeroed on drop.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

/// One key-derivation scheme: a label for logging and a pure derive function.
pub struct KeyScheme {
    pub label: &'static str,
    pub derive: fn(&str) -> DerivedKey,
}

/// Derivation schemes in decryption order. The first entry is the scheme
/// every new encryption uses; the rest exist only to read old blobs.
pub const KEY_SCHEMES: &[KeyScheme] = &[
    KeyScheme {
        label: "pbkdf2-sha1",
        derive: derive_current,
    },
    KeyScheme {
        label: "legacy-md5",
        derive: derive_legacy,
    },
];

/// Current scheme: salt = MD5(passphrase), stretch with PBKDF2-HMAC-SHA1,
/// then hex(MD5(stretched)).
pub fn derive_current(passphrase: &str) -> DerivedKey {
    let salt = Md5::digest(passphrase.as_bytes());

    let mut stretched = Zeroizing::new(vec![0u8; STRETCH_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA1,
        NonZeroU32::new(PBKDF2_ITERATIONS).expect("iteration count is non-zero"),
        salt.as_slice(),
        passphrase.as_bytes(),
        &mut stretched,
    );

    hex_key(Md5::digest(stretched.as_slice()).as_slice())
}

/// Legacy scheme: hex(MD5(passphrase)). No stretching -- weak, kept only to
/// decrypt vaults written by old versions. Never used for encryption.
pub fn derive_legacy(passphrase: &str) -> DerivedKey {
    hex_key(Md5::digest(passphrase.as_bytes()).as_slice())
}

fn hex_key(digest: &[u8]) -> DerivedKey {
    debug_assert_eq!(digest.len() * 2, KEY_LEN);
    let encoded = Zeroizing::new(hex::encode(digest));
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(encoded.as_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_key_matches_known_md5_vector() {
        // md5("test") = 098f6bcd4621d373cade4e832627b4f6
        let key = derive_legacy("test");
        assert_eq!(&key[..], b"098f6bcd4621d373cade4e832627b4f6");
    }

    #[test]
    fn current_scheme_is_deterministic() {
        let a = derive_current("correct horse battery staple");
        let b = derive_current("correct horse battery staple");
        assert_eq!(&a[..], &b[..]);
    }

    #[test]
    fn schemes_disagree_for_the_same_passphrase() {
        let current = derive_current("hunter2");
        let legacy = derive_legacy("hunter2");
        assert_ne!(&current[..], &legacy[..]);
    }

    #[test]
    fn different_passphrases_yield_different_keys() {
        assert_ne!(&derive_current("alpha")[..], &derive_current("beta")[..]);
        assert_ne!(&derive_legacy("alpha")[..], &derive_legacy("beta")[..]);
    }

    #[test]
    fn keys_are_lowercase_hex() {
        for scheme in KEY_SCHEMES {
            let key = (scheme.derive)("anything");
            assert!(
                key.iter().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()),
                "scheme {} produced non-hex key material",
                scheme.label
            );
        }
    }

    #[test]
    fn scheme_table_starts_with_current() {
        assert_eq!(KEY_SCHEMES[0].label, "pbkdf2-sha1");
        let from_table = (KEY_SCHEMES[0].derive)("p");
        assert_eq!(&from_table[..], &derive_current("p")[..]);
    }
}
