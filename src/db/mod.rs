//! Document storage for the conference backend.
//!
//! Every entity is one JSON document addressed by a key. The JSON file
//! backend keeps the on-disk layout of one `<key>.json` per entity; the
//! SQLite backend keeps the same documents in a single table.

mod json_files;
mod repository;
mod sqlite;

pub use json_files::JsonFileStore;
pub use repository::*;
pub use sqlite::{init_database, SqliteStore};

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::{Config, StorageBackend};
use crate::errors::AppError;

/// A stored document together with its revision.
///
/// Revision 0 means the document has never been written by this service.
#[derive(Debug, Clone)]
pub struct Document {
    pub body: Value,
    pub version: i64,
}

/// The storage backend behind the repository.
pub enum DocumentStore {
    JsonFiles(JsonFileStore),
    Sqlite(SqliteStore),
}

impl DocumentStore {
    /// Read a document, `None` when it does not exist yet.
    pub async fn read(&self, key: &str) -> Result<Option<Document>, AppError> {
        match self {
            DocumentStore::JsonFiles(store) => store.read(key).await,
            DocumentStore::Sqlite(store) => store.read(key).await,
        }
    }

    /// Current revision of a document (0 when never written).
    pub async fn version(&self, key: &str) -> Result<i64, AppError> {
        match self {
            DocumentStore::JsonFiles(store) => store.version(key).await,
            DocumentStore::Sqlite(store) => store.version(key).await,
        }
    }

    /// Overwrite a document if its revision still equals `expected_version`.
    ///
    /// Returns the new revision, or `AppError::Conflict` when another writer got there first.
    pub async fn write(
        &self,
        key: &str,
        body: &Value,
        expected_version: i64,
    ) -> Result<i64, AppError> {
        match self {
            DocumentStore::JsonFiles(store) => store.write(key, body, expected_version).await,
            DocumentStore::Sqlite(store) => store.write(key, body, expected_version).await,
        }
    }

    /// Revisions of every document written so far.
    pub async fn revisions(&self) -> Result<BTreeMap<String, i64>, AppError> {
        match self {
            DocumentStore::JsonFiles(store) => store.revisions().await,
            DocumentStore::Sqlite(store) => store.revisions().await,
        }
    }
}

/// Open the configured document store.
pub async fn open_store(config: &Config) -> Result<DocumentStore, AppError> {
    match config.storage {
        StorageBackend::JsonFiles => {
            let store = JsonFileStore::open(&config.data_dir).await?;
            Ok(DocumentStore::JsonFiles(store))
        }
        StorageBackend::Sqlite => {
            let pool = init_database(&config.db_path).await?;
            Ok(DocumentStore::Sqlite(SqliteStore::new(pool)))
        }
    }
}

fn conflict(key: &str, expected_version: i64, current_version: i64) -> AppError {
    AppError::Conflict {
        message: format!(
            "Concurrent modification of {}: expected revision {}, current {}",
            key, expected_version, current_version
        ),
        current_version,
    }
}
