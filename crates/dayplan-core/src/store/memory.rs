//! In-process document store.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex, MutexGuard,
    },
};

use super::{revision_of, BlobDocument, BlobStore};
use crate::error::{Result, SyncError};

/// Document store held in memory.
///
/// It can be switched offline to simulate an unreachable backend, and it
/// counts successful writes so callers can assert how often the store was
/// actually touched.
#[derive(Debug)]
pub struct MemoryBlobStore {
    documents: Mutex<HashMap<String, BlobDocument>>,
    online: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryBlobStore {
    /// Creates an empty, online store.
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            online: AtomicBool::new(true),
            writes: AtomicUsize::new(0),
        }
    }

    /// Switches the store on or offline.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Number of successful `put_raw` and `delete_raw` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SyncError::store_unavailable("memory store is offline"))
        }
    }

    fn documents(&self) -> MutexGuard<'_, HashMap<String, BlobDocument>> {
        // A poisoned map is still structurally valid
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get_raw(&self, key: &str) -> Result<Option<BlobDocument>> {
        self.check_online()?;
        Ok(self.documents().get(key).cloned())
    }

    fn put_raw(&self, key: &str, content: &str, _message: &str) -> Result<String> {
        self.check_online()?;
        let revision = revision_of(content);
        self.documents().insert(
            key.to_string(),
            BlobDocument {
                content: content.to_string(),
                revision: revision.clone(),
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(revision)
    }

    fn delete_raw(&self, key: &str, _message: &str) -> Result<bool> {
        self.check_online()?;
        let existed = self.documents().remove(key).is_some();
        if existed {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(existed)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
