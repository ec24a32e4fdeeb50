//! Configuration module for the conference backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Which document store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per entity under the data directory
    JsonFiles,
    /// A `documents` table in SQLite
    Sqlite,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Invalid configuration value.
#[derive(Debug)]
pub struct ConfigError(String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key guarding admin endpoints (open when unset)
    pub api_psk: Option<String>,
    /// Directory holding the per-entity JSON documents
    pub data_dir: PathBuf,
    /// Storage backend selection
    pub storage: StorageBackend,
    /// Path to SQLite database file (sqlite backend only)
    pub db_path: PathBuf,
    /// Directory uploaded images are written to and served from
    pub upload_dir: PathBuf,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_psk = lookup("CONF_API_PSK").filter(|psk| !psk.trim().is_empty());

        let data_dir: PathBuf = lookup("CONF_DATA_DIR")
            .unwrap_or_else(|| "./data".to_string())
            .into();

        let storage = match lookup("CONF_STORAGE").as_deref().unwrap_or("json") {
            "json" => StorageBackend::JsonFiles,
            "sqlite" => StorageBackend::Sqlite,
            other => {
                return Err(ConfigError(format!(
                    "CONF_STORAGE must be 'json' or 'sqlite', got '{}'",
                    other
                )))
            }
        };

        let db_path = lookup("CONF_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("conference.sqlite"));

        let upload_dir = lookup("CONF_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("uploads"));

        let max_upload_bytes = match lookup("CONF_MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse().map_err(|_| {
                ConfigError(format!("CONF_MAX_UPLOAD_BYTES is not a number: '{}'", raw))
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let raw_addr = lookup("CONF_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError(format!("CONF_BIND_ADDR is not an address: '{}'", raw_addr)))?;

        let log_level = lookup("CONF_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("CONF_LOG_FORMAT").as_deref().unwrap_or("text") {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError(format!(
                    "CONF_LOG_FORMAT must be 'text' or 'json', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            api_psk,
            data_dir,
            storage,
            db_path,
            upload_dir,
            max_upload_bytes,
            bind_addr,
            log_level,
            log_format,
        })
    }
}
