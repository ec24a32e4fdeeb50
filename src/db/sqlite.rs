//! SQLite document backend.
//!
//! Documents live in one table; writes are conditional on the stored version.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::{conflict, Document};
use crate::errors::AppError;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            key TEXT PRIMARY KEY,
            body TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 1,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Document store over a `documents` table.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn read(&self, key: &str) -> Result<Option<Document>, AppError> {
        let row = sqlx::query("SELECT body, version FROM documents WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row.get("body");
        let body: Value = serde_json::from_str(&raw).map_err(|e| {
            AppError::Storage(format!("Document {} is not valid JSON: {}", key, e))
        })?;

        Ok(Some(Document {
            body,
            version: row.get("version"),
        }))
    }

    pub async fn version(&self, key: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT version FROM documents WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("version")).unwrap_or(0))
    }

    pub async fn write(
        &self,
        key: &str,
        body: &Value,
        expected_version: i64,
    ) -> Result<i64, AppError> {
        let encoded = serde_json::to_string(body)
            .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", key, e)))?;
        let now = Utc::now().to_rfc3339();

        let result = if expected_version == 0 {
            sqlx::query(
                "INSERT INTO documents (key, body, version, updated_at) VALUES (?, ?, 1, ?) ON CONFLICT(key) DO NOTHING",
            )
            .bind(key)
            .bind(&encoded)
            .bind(&now)
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query(
                "UPDATE documents SET body = ?, version = version + 1, updated_at = ? WHERE key = ? AND version = ?",
            )
            .bind(&encoded)
            .bind(&now)
            .bind(key)
            .bind(expected_version)
            .execute(&self.pool)
            .await?
        };

        if result.rows_affected() == 0 {
            let current = self.version(key).await?;
            return Err(conflict(key, expected_version, current));
        }

        Ok(expected_version + 1)
    }

    pub async fn revisions(&self) -> Result<BTreeMap<String, i64>, AppError> {
        let rows = sqlx::query("SELECT key, version FROM documents ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("key"), row.get("version")))
            .collect())
    }
}
