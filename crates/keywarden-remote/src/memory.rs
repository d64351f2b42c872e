// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`BlobStore`] used by tests and offline experimentation.
//!
//! Supports injecting a one-shot rename failure on a specific edge, which is
//! how the mid-rotation failure scenarios are exercised.

use std::collections::BTreeMap;
use std::sync::Mutex;

use keywarden_core::KeywardenError;

use crate::store::BlobStore;

/// A [`BlobStore`] backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_rename: Mutex<Option<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without going through `write`.
    pub fn insert(&self, path: &str, data: &[u8]) {
        self.objects
            .lock()
            .expect("memory store poisoned")
            .insert(path.to_string(), data.to_vec());
    }

    /// Snapshot of an object's contents, if present.
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("memory store poisoned")
            .get(path)
            .cloned()
    }

    /// All object paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.objects
            .lock()
            .expect("memory store poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Make the next `rename(from, to)` of exactly this edge fail with a
    /// transport error, leaving the store untouched.
    pub fn fail_next_rename(&self, from: &str, to: &str) {
        *self.fail_rename.lock().expect("memory store poisoned") =
            Some((from.to_string(), to.to_string()));
    }
}

impl BlobStore for MemoryStore {
    fn stat(&self, path: &str) -> Result<bool, KeywardenError> {
        Ok(self
            .objects
            .lock()
            .expect("memory store poisoned")
            .contains_key(path))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, KeywardenError> {
        self.contents(path)
            .ok_or_else(|| KeywardenError::NotFound { path: path.to_string() })
    }

    fn write(&self, path: &str, data: &[u8]) -> Result<(), KeywardenError> {
        self.insert(path, data);
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), KeywardenError> {
        let mut armed = self.fail_rename.lock().expect("memory store poisoned");
        if let Some((f, t)) = armed.as_ref()
            && f == from
            && t == to
        {
            *armed = None;
            return Err(KeywardenError::transport(format!(
                "injected failure renaming {from} -> {to}"
            )));
        }
        drop(armed);

        let mut objects = self.objects.lock().expect("memory store poisoned");
        let data = objects
            .remove(from)
            .ok_or_else(|| KeywardenError::NotFound { path: from.to_string() })?;
        objects.insert(to.to_string(), data);
        Ok(())
    }
}
