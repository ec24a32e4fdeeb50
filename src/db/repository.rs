//! Typed repository over the document store.
//!
//! Each entity is read and written as a whole document. Writers are
//! serialized in-process and every write is checked against the revision
//! that was read, so a concurrent writer yields a conflict instead of a lost update.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use super::DocumentStore;
use crate::errors::AppError;

/// A collection persisted as one document.
pub trait StoredDocument: Serialize + DeserializeOwned + Send + Sync + Sized {
    /// Storage key (file stem for the JSON backend).
    const KEY: &'static str;

    /// Payload returned when nothing has been stored yet.
    fn default_document() -> Self;

    /// Fix up a freshly loaded document (e.g. fill fields older files lack).
    fn normalize(self) -> Self {
        self
    }
}

/// A loaded document and the revision it was read at.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub value: T,
    pub revision: i64,
}

/// Repository for all data operations.
pub struct Repository {
    store: DocumentStore,
    write_lock: Mutex<()>,
}

impl Repository {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Current revision of a document.
    pub async fn revision<D: StoredDocument>(&self) -> Result<i64, AppError> {
        self.store.version(D::KEY).await
    }

    /// Revisions of every stored document.
    pub async fn revisions(&self) -> Result<BTreeMap<String, i64>, AppError> {
        self.store.revisions().await
    }

    /// Load a document, falling back to its default payload when absent.
    pub async fn load<D: StoredDocument>(&self) -> Result<Versioned<D>, AppError> {
        match self.store.read(D::KEY).await? {
            Some(doc) => {
                let value: D = serde_json::from_value(doc.body).map_err(|e| {
                    AppError::Storage(format!(
                        "Document {} has an unexpected shape: {}",
                        D::KEY,
                        e
                    ))
                })?;
                Ok(Versioned {
                    value: value.normalize(),
                    revision: doc.version,
                })
            }
            None => Ok(Versioned {
                value: D::default_document(),
                revision: 0,
            }),
        }
    }

    /// Overwrite a document wholesale.
    pub async fn replace<D: StoredDocument>(&self, value: &D) -> Result<i64, AppError> {
        let _guard = self.write_lock.lock().await;
        let current = self.store.version(D::KEY).await?;
        self.write(value, current).await
    }

    /// Read-modify-write a document.
    ///
    /// Nothing is written when `apply` returns an error.
    pub async fn mutate<D, R, F>(&self, apply: F) -> Result<(R, i64), AppError>
    where
        D: StoredDocument,
        R: Send,
        F: FnOnce(&mut D) -> Result<R, AppError> + Send,
    {
        let _guard = self.write_lock.lock().await;
        let Versioned {
            mut value,
            revision,
        } = self.load::<D>().await?;

        let outcome = apply(&mut value)?;
        let revision = self.write(&value, revision).await?;

        Ok((outcome, revision))
    }

    async fn write<D: StoredDocument>(&self, value: &D, expected: i64) -> Result<i64, AppError> {
        let body = serde_json::to_value(value)
            .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", D::KEY, e)))?;
        self.store.write(D::KEY, &body, expected).await
    }
}
