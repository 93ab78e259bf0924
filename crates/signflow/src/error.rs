use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignFlowError {
    #[error("No valid identification method found")]
    InvalidIdentificationMethod,

    #[error("Invalid {kind} status code: {code}")]
    InvalidStatus { kind: &'static str, code: i32 },

    #[error("File not found: {0}")]
    FileNotFound(i64),

    #[error("Sign request not found: {0}")]
    SignRequestNotFound(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}

impl SignFlowError {
    /// Stable numeric code carried into error payloads.
    pub fn code(&self) -> i32 {
        match self {
            SignFlowError::InvalidIdentificationMethod | SignFlowError::InvalidStatus { .. } => {
                422
            }
            SignFlowError::FileNotFound(_) | SignFlowError::SignRequestNotFound(_) => 404,
            SignFlowError::Config(_)
            | SignFlowError::Cache(_)
            | SignFlowError::Process(_)
            | SignFlowError::Database(_) => 500,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid value '{value}' for app config key '{key}'")]
    InvalidValue { key: String, value: String },
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to serialize cache value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache backend rejected '{key}': {reason}")]
    Backend { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn worker '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read process table: {0}")]
    ListFailed(String),

    #[error("Failed to signal process {pid}: {reason}")]
    SignalFailed { pid: i32, reason: String },

    #[error("Native process signalling is not available on this platform")]
    Unsupported,
}

pub type Result<T> = std::result::Result<T, SignFlowError>;
