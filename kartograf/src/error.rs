//! Error types used by the crate.

use thiserror::Error;

/// Kartograf error type.
#[derive(Debug, Error)]
pub enum KartografError {
    /// Transport error while talking to a remote service.
    #[error("failed to load data")]
    IO,
    /// Remote service responded with a non-success status.
    #[error("request failed with status {0}")]
    FetchFailed(u16),
    /// Geocoder or places search found nothing for the request.
    #[error("nothing found")]
    NotFound,
    /// Response body did not have the expected shape.
    #[error("failed to decode response")]
    Decoding(#[from] serde_json::Error),
    /// Invalid viewer configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
    /// Error reading data from the FS.
    #[error("failed to read file")]
    FsIo(#[from] std::io::Error),
}

impl From<reqwest::Error> for KartografError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::FetchFailed(status.as_u16()),
            None => Self::IO,
        }
    }
}
