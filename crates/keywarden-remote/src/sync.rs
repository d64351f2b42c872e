// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The vault sync engine: load (read + fallback-decrypt) and save
//! (encrypt + rotate + write).
//!
//! The passphrase is a parameter of every call; nothing is derived ahead of
//! time or cached across calls, so one engine can serve several vaults or
//! passphrase retries.

use keywarden_core::{KeywardenError, RemoteConfig};
use keywarden_vault::envelope;
use keywarden_vault::records::{self, ServiceData};
use secrecy::SecretString;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::rotate;
use crate::store::BlobStore;

/// Load/save engine for one vault blob on one store.
#[derive(Debug)]
pub struct VaultSync<S: BlobStore> {
    store: S,
    primary_path: String,
}

impl<S: BlobStore> VaultSync<S> {
    pub fn new(store: S, primary_path: impl Into<String>) -> Self {
        Self {
            store,
            primary_path: primary_path.into(),
        }
    }

    /// Engine for the blob location named by the remote config.
    pub fn from_config(store: S, config: &RemoteConfig) -> Self {
        Self::new(store, config.primary_path())
    }

    /// Fetch and decrypt the vault. `None` means the primary blob does not
    /// exist yet (first run) -- every other failure propagates, including
    /// `Authentication`, which the caller handles by re-prompting and
    /// calling `load` again.
    pub fn load(&self, passphrase: &SecretString) -> Result<Option<Zeroizing<Vec<u8>>>, KeywardenError> {
        let blob = match self.store.read(&self.primary_path) {
            Ok(blob) => blob,
            Err(err) if err.is_not_found() => {
                info!(path = %self.primary_path, "no remote vault found");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        debug!(path = %self.primary_path, bytes = blob.len(), "remote vault fetched");
        envelope::decrypt_with_fallback(&blob, passphrase).map(Some)
    }

    /// Encrypt and store the vault, rotating backups first when a primary
    /// already exists.
    ///
    /// Encryption always uses the current key scheme, which transparently
    /// upgrades a vault that was loaded via the legacy fallback. If rotation
    /// fails, nothing has been written and the remote primary is still the
    /// last saved version. A write failure after a completed rotation is not
    /// rolled back; the previous content survives as backup `.1`.
    pub fn save(&self, plaintext: &[u8], passphrase: &SecretString) -> Result<(), KeywardenError> {
        let blob = envelope::encrypt(plaintext, passphrase)?;

        if self.store.stat(&self.primary_path)? {
            debug!(path = %self.primary_path, "rotating backups");
            rotate::rotate(&self.store, &self.primary_path)?;
        }

        self.store.write(&self.primary_path, &blob)?;
        info!(path = %self.primary_path, bytes = blob.len(), "vault saved");
        Ok(())
    }

    /// [`load`](Self::load) plus JSON decoding; first run yields an empty
    /// record set.
    pub fn load_records(&self, passphrase: &SecretString) -> Result<ServiceData, KeywardenError> {
        match self.load(passphrase)? {
            Some(plaintext) => {
                let data = records::decode(&plaintext)?;
                info!(services = data.len(), "vault records loaded");
                Ok(data)
            }
            None => Ok(ServiceData::new()),
        }
    }

    /// JSON encoding plus [`save`](Self::save).
    pub fn save_records(
        &self,
        data: &ServiceData,
        passphrase: &SecretString,
    ) -> Result<(), KeywardenError> {
        let payload = Zeroizing::new(records::encode(data)?);
        self.save(&payload, passphrase)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::rotate::backup_path;
    use keywarden_vault::ServiceRecord;

    const PRIMARY: &str = ".keywarden/db.bin";

    fn pass(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn engine() -> VaultSync<MemoryStore> {
        VaultSync::new(MemoryStore::new(), PRIMARY)
    }

    #[test]
    fn first_run_load_returns_none() {
        let sync = engine();
        assert!(sync.load(&pass("master")).unwrap().is_none());
    }

    #[test]
    fn first_save_skips_rotation_and_writes_only_the_primary() {
        let sync = engine();
        sync.save(b"payload", &pass("master")).unwrap();

        assert_eq!(sync.store().paths(), vec![PRIMARY.to_string()]);
        assert_eq!(&sync.load(&pass("master")).unwrap().unwrap()[..], b"payload");
    }

    #[test]
    fn save_load_roundtrip_with_wrong_passphrase_rejected() {
        let sync = engine();
        sync.save(b"payload", &pass("master")).unwrap();

        let err = sync.load(&pass("not-master")).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn second_save_rotates_the_previous_primary_into_slot_one() {
        let sync = engine();
        sync.save(b"version 1", &pass("master")).unwrap();
        let first_blob = sync.store().contents(PRIMARY).unwrap();

        sync.save(b"version 2", &pass("master")).unwrap();

        assert_eq!(sync.store().contents(&backup_path(PRIMARY, 1)).unwrap(), first_blob);
        assert_eq!(&sync.load(&pass("master")).unwrap().unwrap()[..], b"version 2");
    }

    #[test]
    fn save_over_short_chain_shifts_it() {
        // Remote state {primary, .1, .2} must become
        // {primary(new), .1(=old primary), .2(=old .1), .3(=old .2)}.
        let store = MemoryStore::new();
        store.insert(PRIMARY, b"p");
        store.insert(&backup_path(PRIMARY, 1), b"b1");
        store.insert(&backup_path(PRIMARY, 2), b"b2");
        let sync = VaultSync::new(store, PRIMARY);

        sync.save(b"new", &pass("master")).unwrap();

        assert_eq!(sync.store().contents(&backup_path(PRIMARY, 1)).unwrap(), b"p");
        assert_eq!(sync.store().contents(&backup_path(PRIMARY, 2)).unwrap(), b"b1");
        assert_eq!(sync.store().contents(&backup_path(PRIMARY, 3)).unwrap(), b"b2");
        assert!(!sync.store().stat(&backup_path(PRIMARY, 4)).unwrap());
        assert!(!sync.store().stat(&backup_path(PRIMARY, 5)).unwrap());
        assert_eq!(&sync.load(&pass("master")).unwrap().unwrap()[..], b"new");
    }

    #[test]
    fn save_over_full_chain_evicts_the_oldest_backup() {
        let store = MemoryStore::new();
        store.insert(PRIMARY, b"p");
        for slot in 1..=5 {
            store.insert(&backup_path(PRIMARY, slot), format!("b{slot}").as_bytes());
        }
        let sync = VaultSync::new(store, PRIMARY);

        sync.save(b"new", &pass("master")).unwrap();

        // Previous {primary, .1..4} shifted; old .5 no longer retrievable.
        assert_eq!(sync.store().contents(&backup_path(PRIMARY, 1)).unwrap(), b"p");
        assert_eq!(sync.store().contents(&backup_path(PRIMARY, 2)).unwrap(), b"b1");
        assert_eq!(sync.store().contents(&backup_path(PRIMARY, 5)).unwrap(), b"b4");
        assert!(sync.store().paths().iter().all(|p| !p.ends_with(".6")));
        assert_eq!(sync.store().paths().len(), 6);
    }

    #[test]
    fn mid_rotation_failure_aborts_the_save_and_keeps_the_primary() {
        let store = MemoryStore::new();
        let sync = VaultSync::new(store, PRIMARY);
        let passphrase = pass("master");

        sync.save(b"original", &passphrase).unwrap();
        for slot in 1..=3 {
            sync.store().insert(&backup_path(PRIMARY, slot), b"backup");
        }
        sync.store()
            .fail_next_rename(&backup_path(PRIMARY, 3), &backup_path(PRIMARY, 4));

        let err = sync.save(b"replacement", &passphrase).unwrap_err();
        assert!(matches!(err, KeywardenError::RotationAborted { .. }));

        // The remote primary is unchanged: a subsequent load yields the
        // original plaintext.
        assert_eq!(&sync.load(&passphrase).unwrap().unwrap()[..], b"original");
    }

    #[test]
    fn legacy_blob_loads_and_the_next_save_upgrades_it() {
        let legacy_key = keywarden_vault::kdf::derive_legacy("master");
        let legacy_blob = keywarden_vault::crypto::seal(&legacy_key, b"old data").unwrap();

        let store = MemoryStore::new();
        store.insert(PRIMARY, &legacy_blob);
        let sync = VaultSync::new(store, PRIMARY);
        let passphrase = pass("master");

        let plaintext = sync.load(&passphrase).unwrap().unwrap();
        assert_eq!(&plaintext[..], b"old data");

        sync.save(&plaintext, &passphrase).unwrap();
        let upgraded = sync.store().contents(PRIMARY).unwrap();
        let current_key = keywarden_vault::kdf::derive_current("master");
        assert!(keywarden_vault::crypto::open(&current_key, &upgraded).is_ok());
    }

    #[test]
    fn record_level_roundtrip_and_first_run() {
        let sync = engine();
        let passphrase = pass("master");

        // First run: empty record set, nothing written yet.
        assert!(sync.load_records(&passphrase).unwrap().is_empty());
        assert!(sync.store().paths().is_empty());

        let mut data = ServiceData::new();
        let mut record = ServiceRecord::new("github");
        record.username = "octocat".into();
        data.insert(record.name.clone(), record);

        sync.save_records(&data, &passphrase).unwrap();
        let loaded = sync.load_records(&passphrase).unwrap();
        assert_eq!(loaded, data);
    }
}
