// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backup-chain rotation: shift numbered backups up one slot, then move the
//! primary into slot 1.
//!
//! Slots are processed oldest-first (`.4 -> .5` down to `.1 -> .2`) so no
//! rename overwrites a backup that has not moved yet; whatever occupied the
//! last slot is silently evicted. Any failed rename aborts the whole
//! rotation with [`KeywardenError::RotationAborted`] -- at that point the
//! primary has not been touched, so the caller must abandon the save rather
//! than write over a partially rotated chain. Completed renames are not
//! rolled back: the window between a rotated chain and the new primary write
//! is a known risk, not something this layer papers over.

use keywarden_core::KeywardenError;
use tracing::debug;

use crate::store::BlobStore;

/// Number of retained backups. Slot 5 is the oldest and gets evicted.
pub const MAX_BACKUPS: u32 = 5;

/// Remote path of backup slot `slot` for a primary blob.
pub fn backup_path(primary: &str, slot: u32) -> String {
    format!("{primary}.{slot}")
}

/// Rotate the backup chain of `primary`, making room in slot 1.
///
/// Missing slots are skipped without error. Call this only when the primary
/// exists and immediately before writing its replacement.
pub fn rotate<S: BlobStore + ?Sized>(store: &S, primary: &str) -> Result<(), KeywardenError> {
    for slot in (1..MAX_BACKUPS).rev() {
        let from = backup_path(primary, slot);
        let to = backup_path(primary, slot + 1);

        if !store.stat(&from)? {
            continue;
        }
        debug!(%from, %to, "shifting backup");
        store.rename(&from, &to).map_err(|e| KeywardenError::RotationAborted {
            from: from.clone(),
            to: to.clone(),
            source: Box::new(e),
        })?;
    }

    if store.stat(primary)? {
        let to = backup_path(primary, 1);
        debug!(from = primary, %to, "backing up primary");
        store.rename(primary, &to).map_err(|e| KeywardenError::RotationAborted {
            from: primary.to_string(),
            to,
            source: Box::new(e),
        })?;
    }
    Ok(())
}
