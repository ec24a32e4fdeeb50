//! One-JSON-file-per-entity backend.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::Mutex;

use super::{conflict, Document};
use crate::errors::AppError;

/// Sidecar file mapping document keys to their revision.
const REVISIONS_FILE: &str = ".revisions.json";

/// Stores each document as `<dir>/<key>.json`.
pub struct JsonFileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store, creating the data directory if needed.
    pub async fn open(dir: &Path) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(dir).await?;
        tracing::debug!("JSON document store at {:?}", dir);
        Ok(Self {
            dir: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub async fn read(&self, key: &str) -> Result<Option<Document>, AppError> {
        let raw = match tokio::fs::read_to_string(self.document_path(key)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let body: Value = serde_json::from_str(&raw).map_err(|e| {
            AppError::Storage(format!("Document {} is not valid JSON: {}", key, e))
        })?;
        let version = self.version(key).await?;

        Ok(Some(Document { body, version }))
    }

    pub async fn version(&self, key: &str) -> Result<i64, AppError> {
        Ok(self.load_revisions().await?.get(key).copied().unwrap_or(0))
    }

    pub async fn write(
        &self,
        key: &str,
        body: &Value,
        expected_version: i64,
    ) -> Result<i64, AppError> {
        // Revision check, document write and revision bump happen under one lock
        let _guard = self.write_lock.lock().await;

        let mut revisions = self.load_revisions().await?;
        let current = revisions.get(key).copied().unwrap_or(0);
        if current != expected_version {
            return Err(conflict(key, expected_version, current));
        }

        let encoded = serde_json::to_vec_pretty(body)
            .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", key, e)))?;
        write_atomically(&self.document_path(key), &encoded).await?;

        let next = current + 1;
        revisions.insert(key.to_string(), next);
        let encoded = serde_json::to_vec_pretty(&revisions)
            .map_err(|e| AppError::Internal(format!("Failed to encode revisions: {}", e)))?;
        write_atomically(&self.dir.join(REVISIONS_FILE), &encoded).await?;

        Ok(next)
    }

    pub async fn revisions(&self) -> Result<BTreeMap<String, i64>, AppError> {
        self.load_revisions().await
    }

    async fn load_revisions(&self) -> Result<BTreeMap<String, i64>, AppError> {
        match tokio::fs::read_to_string(self.dir.join(REVISIONS_FILE)).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| AppError::Storage(format!("Revision file is corrupt: {}", e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write to a sibling temp file and rename it over the target.
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
