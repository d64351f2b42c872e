// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote synchronization for the Keywarden vault.
//!
//! [`BlobStore`] is the seam between the sync engine and the transport: a
//! minimal stat/read/write/rename contract over one hierarchical namespace.
//! [`DavClient`] implements it against a WebDAV endpoint with blocking I/O;
//! [`MemoryStore`] implements it in memory for tests. On top sit the backup
//! [`rotate`] protocol and [`VaultSync`], the load/save engine.
//!
//! Everything here is synchronous and single-writer by design: no remote
//! locking is attempted, and two processes saving against the same account
//! can corrupt the backup chain. Callers wanting timeouts or retries wrap
//! the whole `load`/`save` call.

pub mod memory;
pub mod rotate;
pub mod store;
pub mod sync;
pub mod webdav;

pub use memory::MemoryStore;
pub use rotate::{MAX_BACKUPS, backup_path, rotate};
pub use store::BlobStore;
pub use sync::VaultSync;
pub use webdav::DavClient;
