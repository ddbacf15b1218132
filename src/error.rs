// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// One failed HTTP attempt.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Every candidate URL exhausted its retry budget.
#[derive(Debug, Error)]
#[error("fetch {url} failed after {attempts} attempts: {last}")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    #[source]
    pub last: TransportError,
}

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Conditions that abort a run before any category is processed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode run record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
