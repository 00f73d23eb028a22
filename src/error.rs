//! Error types for the coin dashboard

use thiserror::Error;

/// Errors that can occur when fetching data from a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Too many requests! Try again in a few seconds")]
    RateLimitExceeded,

    /// Requested resource does not exist upstream (e.g. unknown coin id)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider API error (non-2xx)
    #[error("Provider API error: {0}")]
    ApiError(String),
}

impl ProviderError {
    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Creates an ApiError
    pub fn api(msg: impl Into<String>) -> Self {
        Self::ApiError(msg.into())
    }
}

/// Errors raised by the persistence adapters
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored blob could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by table view operations
#[derive(Debug, Error)]
pub enum TableError {
    /// Page size outside the offered options
    #[error("Invalid page size {size}, expected one of {allowed:?}")]
    InvalidPageSize {
        size: usize,
        allowed: &'static [usize],
    },

    /// The table was built with this feature switched off
    #[error("Table feature disabled: {0}")]
    FeatureDisabled(&'static str),

    /// The column is not part of this table
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Writing the export file failed
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    /// Creates an InvalidPageSize error
    pub fn invalid_page_size(size: usize, allowed: &'static [usize]) -> Self {
        Self::InvalidPageSize { size, allowed }
    }
}
