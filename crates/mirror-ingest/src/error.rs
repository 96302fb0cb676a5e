//! Error types for the mirror pipeline

use thiserror::Error;

/// Result type alias for ingestion operations
pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Failures that can surface from fetching, persisting or configuring a run
///
/// A missing person is not an error: the fetcher reports it as
/// `FetchResult::NotFound`.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Transport or body decoding failure while talking to the source
    #[error("Request to the people endpoint failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a status other than success or 404
    #[error("Unexpected status {status} while fetching person {id}")]
    UnexpectedStatus { id: u64, status: reqwest::StatusCode },

    /// SQL query or connection error
    #[error("Database operation failed: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration is invalid or missing
    #[error("Configuration error: {0}. Check the environment and .env file.")]
    Config(String),

    /// A persistence task panicked or was cancelled before finishing
    #[error("Persistence task did not complete: {0}")]
    TaskPanicked(String),

    /// One or more persistence tasks failed; `first` is the earliest failure observed
    #[error("{failed} of {total} persistence tasks failed; first failure: {first}")]
    PersistenceFailed {
        failed: usize,
        total: usize,
        first: Box<IngestError>,
    },
}

impl IngestError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
