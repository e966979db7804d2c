//! Persistence for plan records.
//!
//! The backend is a [`BlobStore`]: a repository of named, version-tracked
//! documents that can only be read or overwritten as a whole. On top of it
//! sit two document-level abstractions:
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐
//! │ MultiRecordStore │    │    HistoryLog    │
//! │ (date → record,  │    │ (finalized days, │
//! │  retention)      │    │  never trimmed)  │
//! └────────┬─────────┘    └────────┬─────────┘
//!          └──────────┬────────────┘
//!                     ▼
//!          ┌──────────────────────┐
//!          │  dyn BlobStore       │
//!          │ (SQLite / in-memory) │
//!          └──────────────────────┘
//! ```
//!
//! Every mutation is a full read-modify-write of one document. There is no
//! locking between writers: the last write wins.

use sha2::{Digest, Sha256};

use crate::error::Result;

pub mod history;
pub mod memory;
pub mod records;
pub mod sqlite;

pub use history::{HistoryEntry, HistoryLog};
pub use memory::MemoryBlobStore;
pub use records::{MultiRecordStore, RetentionPolicy, UpsertReport};
pub use sqlite::{RevisionEntry, SqliteBlobStore};

/// A document as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobDocument {
    pub content: String,
    /// Revision pointer of this content
    pub revision: String,
}

/// Minimal read/write/delete access to named documents.
///
/// Every failure (unreachable backend, refused write, revision conflict)
/// surfaces as [`crate::SyncError::StoreUnavailable`]. Callers must not assume
/// atomicity across keys.
pub trait BlobStore: Send + Sync {
    /// Reads a document, `None` when it does not exist.
    fn get_raw(&self, key: &str) -> Result<Option<BlobDocument>>;

    /// Overwrites a document, creating it when missing. Returns the new
    /// revision.
    fn put_raw(&self, key: &str, content: &str, message: &str) -> Result<String>;

    /// Deletes a document. Returns whether it existed.
    fn delete_raw(&self, key: &str, message: &str) -> Result<bool>;

    /// Whether a document exists.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get_raw(key)?.is_some())
    }

    /// Short human-readable description of the backend.
    fn describe(&self) -> String;
}

/// Revision pointer for `content`: hex SHA-256 of its bytes.
pub fn revision_of(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
