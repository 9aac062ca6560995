//! Error types for Syncache
//!
//! All modules use `SyncacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Syncache operations
pub type SyncacheResult<T> = Result<T, SyncacheError>;

/// All errors that can occur in Syncache
#[derive(Error, Debug)]
pub enum SyncacheError {
    // Remote errors
    #[error("{0}")]
    Remote(String),

    // Cache errors
    #[error("Fetch failed for {key}: {message}")]
    Fetch { key: String, message: String },

    #[error("Query has not been initialised: {0}")]
    MissingFetcher(String),

    // Mutation errors
    #[error("{operation} failed: {message}")]
    Mutation { operation: String, message: String },

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl SyncacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a remote error from a message
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    /// Create a mutation failure for the named operation
    pub fn mutation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Mutation {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Remote(_) | Self::Fetch { .. } | Self::Mutation { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Remote(_) | Self::Fetch { .. } => {
                Some("The simulated network fails at random; run the command again")
            }
            Self::Mutation { .. } => Some("The cache was rolled back; retry the change"),
            Self::ConfigInvalid { .. } => Some("Run: syncache config show"),
            Self::MissingFetcher(_) => Some("Acquire the key with a fetcher before refetching"),
            _ => None,
        }
    }
}
