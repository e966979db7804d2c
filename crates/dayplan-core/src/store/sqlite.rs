//! SQLite-backed, version-tracked document store.

use std::path::{Path, PathBuf};

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};

use super::{revision_of, BlobDocument, BlobStore};
use crate::error::{DatabaseResultExt, Result, StoreResultExt, SyncError};

const SELECT_DOCUMENT_SQL: &str = "SELECT content, revision FROM documents WHERE key = ?1";
const SELECT_REVISION_SQL: &str = "SELECT revision FROM documents WHERE key = ?1";
const INSERT_DOCUMENT_SQL: &str =
    "INSERT INTO documents (key, content, revision, updated_at) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_DOCUMENT_SQL: &str = "UPDATE documents SET content = ?2, revision = ?3, updated_at = ?4 WHERE key = ?1 AND revision = ?5";
const DELETE_DOCUMENT_SQL: &str = "DELETE FROM documents WHERE key = ?1";
const INSERT_REVISION_SQL: &str =
    "INSERT INTO revisions (key, revision, message, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_REVISIONS_SQL: &str =
    "SELECT revision, message, created_at FROM revisions WHERE key = ?1 ORDER BY id ASC";

/// One entry of a document's write history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionEntry {
    /// Revision written, `None` for a delete
    pub revision: Option<String>,
    pub message: String,
    pub created_at: String,
}

/// Document store kept in a single SQLite file.
///
/// A connection is opened per operation, so the store itself holds only the
/// path and can be shared freely.
#[derive(Debug, Clone)]
pub struct SqliteBlobStore {
    path: PathBuf,
}

impl SqliteBlobStore {
    /// Opens the store at `path` and initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Database` if the file cannot be opened or the
    /// schema cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let connection = Connection::open(&path).db_context("Failed to open database connection")?;
        connection
            .execute_batch(include_str!("../../assets/schema.sql"))
            .db_context("Failed to initialize database schema")?;
        Ok(Self { path })
    }

    /// Path of the backing SQLite file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write history of `key`, oldest first.
    pub fn revisions(&self, key: &str) -> Result<Vec<RevisionEntry>> {
        let connection = self.connect()?;
        let mut stmt = connection
            .prepare(SELECT_REVISIONS_SQL)
            .store_context("Failed to prepare revision query")?;
        let rows = stmt
            .query_map(params![key], |row| {
                Ok(RevisionEntry {
                    revision: row.get(0)?,
                    message: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .store_context("Failed to query revisions")?;
        let revisions = rows
            .collect::<std::result::Result<Vec<_>, _>>()
            .store_context("Failed to read revision row")?;
        Ok(revisions)
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.path).store_context(format!(
            "Failed to open document store at '{}'",
            self.path.display()
        ))
    }
}

impl BlobStore for SqliteBlobStore {
    fn get_raw(&self, key: &str) -> Result<Option<BlobDocument>> {
        let connection = self.connect()?;
        connection
            .query_row(SELECT_DOCUMENT_SQL, params![key], |row| {
                Ok(BlobDocument {
                    content: row.get(0)?,
                    revision: row.get(1)?,
                })
            })
            .optional()
            .store_context(format!("Failed to read document '{key}'"))
    }

    fn put_raw(&self, key: &str, content: &str, message: &str) -> Result<String> {
        let mut connection = self.connect()?;
        let tx = connection
            .transaction()
            .store_context("Failed to begin transaction")?;

        let now = Timestamp::now().to_string();
        let revision = revision_of(content);

        let current: Option<String> = tx
            .query_row(SELECT_REVISION_SQL, params![key], |row| row.get(0))
            .optional()
            .store_context(format!("Failed to read revision of '{key}'"))?;

        match current {
            Some(base) => {
                let updated = tx
                    .execute(UPDATE_DOCUMENT_SQL, params![key, content, &revision, &now, &base])
                    .store_context(format!("Failed to update document '{key}'"))?;
                if updated == 0 {
                    return Err(SyncError::store_unavailable(format!(
                        "Revision conflict while updating '{key}'"
                    )));
                }
            }
            None => {
                tx.execute(INSERT_DOCUMENT_SQL, params![key, content, &revision, &now])
                    .store_context(format!("Failed to create document '{key}'"))?;
            }
        }

        tx.execute(INSERT_REVISION_SQL, params![key, &revision, message, &now])
            .store_context("Failed to record revision")?;
        tx.commit().store_context("Failed to commit transaction")?;

        Ok(revision)
    }

    fn delete_raw(&self, key: &str, message: &str) -> Result<bool> {
        let mut connection = self.connect()?;
        let tx = connection
            .transaction()
            .store_context("Failed to begin transaction")?;

        let deleted = tx
            .execute(DELETE_DOCUMENT_SQL, params![key])
            .store_context(format!("Failed to delete document '{key}'"))?;
        if deleted > 0 {
            let now = Timestamp::now().to_string();
            tx.execute(
                INSERT_REVISION_SQL,
                params![key, Option::<String>::None, message, &now],
            )
            .store_context("Failed to record revision")?;
        }
        tx.commit().store_context("Failed to commit transaction")?;

        Ok(deleted > 0)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}
