// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The blob-store trait: the minimal remote contract the sync engine needs.

use keywarden_core::KeywardenError;

/// Whole-object operations over one hierarchical namespace.
///
/// Paths are logical names relative to the store root, e.g.
/// `.keywarden/db.bin` or `.keywarden/db.bin.3`. Implementations must keep
/// "object not found" distinguishable from every other failure: `stat`
/// reports it as `Ok(false)` and `read` as [`KeywardenError::NotFound`],
/// because an absent primary blob means "first run" rather than an error.
pub trait BlobStore {
    /// Whether an object exists at `path`. `Err` is reserved for transport,
    /// auth, and permission failures -- absence is `Ok(false)`.
    fn stat(&self, path: &str) -> Result<bool, KeywardenError>;

    /// Read the whole object.
    fn read(&self, path: &str) -> Result<Vec<u8>, KeywardenError>;

    /// Write the whole object, creating or replacing it.
    fn write(&self, path: &str, data: &[u8]) -> Result<(), KeywardenError>;

    /// Move an object, overwriting any object already at `to`.
    fn rename(&self, from: &str, to: &str) -> Result<(), KeywardenError>;
}
