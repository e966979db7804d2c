//! Error types for the synchronization engine.

use std::fmt;
use std::path::PathBuf;

use jiff::civil::Date;
use thiserror::Error;

use crate::lifecycle::TaskConflict;

/// Comprehensive error type for all engine operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The backing document store could not be reached or refused the
    /// operation (I/O, auth, revision conflicts all collapse into this kind)
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },
    /// Schema setup errors for the SQLite-backed document store
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// A stored entry could not be decoded at all
    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },
    /// Planned tasks overlap in time and cannot be confirmed
    #[error("{} overlapping task pair(s) block confirmation", conflicts.len())]
    OverlapConflict { conflicts: Vec<TaskConflict> },
    /// No planned task has a name
    #[error("The plan has no named tasks")]
    EmptyPlan,
    /// The record was finalized and no longer accepts edits
    #[error("Record for {date} is finalized and can no longer be edited")]
    RecordFinalized { date: Date },
    /// Task not found for the given ID
    #[error("Task with ID {task_id} not found")]
    TaskNotFound { task_id: u32 },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> SyncError {
        SyncError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl SyncError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a store-unavailable error with the given message.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Whether the error came from the storage backend rather than from
    /// validating user input.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::Database { .. } | Self::Serialization { .. }
        )
    }
}

/// Extension trait collapsing any backend error into
/// [`SyncError::StoreUnavailable`] with a context message.
pub trait StoreResultExt<T> {
    /// Map the error with a message.
    fn store_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display;
}

impl<T, E> StoreResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn store_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| SyncError::StoreUnavailable {
            message: format!("{context}: {e}"),
        })
    }
}

/// Specialized extension trait for schema setup Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|source| SyncError::Database {
            message: message.to_string(),
            source,
        })
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, SyncError>;
