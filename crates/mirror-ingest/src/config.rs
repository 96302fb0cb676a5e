//! Configuration management
//!
//! Values come from the process environment (after loading `.env` with
//! `dotenvy`), falling back to the defaults below. Command-line flags are
//! applied on top by the binary.

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, IngestResult};

// ============================================================================
// Pipeline Configuration Constants
// ============================================================================

/// Default people endpoint; ids are appended as a path segment.
pub const DEFAULT_SOURCE_URL: &str = "https://swapi.dev/api/people";

/// Default number of ids fetched concurrently per group.
pub const DEFAULT_FETCH_BATCH_SIZE: usize = 4;

/// Default number of items handed to one persistence task.
pub const DEFAULT_INGEST_BATCH_SIZE: usize = 4;

// ============================================================================
// Database Configuration Constants
// ============================================================================

pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 1;

pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Batch sizes and source location for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub source_url: String,
    pub fetch_batch_size: usize,
    pub ingest_batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch_batch_size: DEFAULT_FETCH_BATCH_SIZE,
            ingest_batch_size: DEFAULT_INGEST_BATCH_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Load from `SWAPI_URL`, `FETCH_BATCH_SIZE` and `INGEST_BATCH_SIZE`
    pub fn from_env() -> IngestResult<Self> {
        let config = Self {
            source_url: std::env::var("SWAPI_URL")
                .unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string()),
            fetch_batch_size: env_parse("FETCH_BATCH_SIZE")?
                .unwrap_or(DEFAULT_FETCH_BATCH_SIZE),
            ingest_batch_size: env_parse("INGEST_BATCH_SIZE")?
                .unwrap_or(DEFAULT_INGEST_BATCH_SIZE),
        };

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> IngestResult<()> {
        if self.source_url.trim().is_empty() {
            return Err(IngestError::config("Source URL cannot be empty"));
        }

        if self.fetch_batch_size == 0 {
            return Err(IngestError::config("Fetch batch size must be greater than 0"));
        }

        // Also the not-found threshold, so zero would end every run immediately
        if self.ingest_batch_size == 0 {
            return Err(IngestError::config("Ingest batch size must be greater than 0"));
        }

        Ok(())
    }
}

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
            connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Load from the environment
    ///
    /// `DATABASE_URL` wins when set. Otherwise the URL is assembled from
    /// `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_HOST` (or `HOST`),
    /// `POSTGRES_PORT` (or `PORT`) and `POSTGRES_DB`.
    pub fn from_env() -> IngestResult<Self> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => url_from_parts()?,
        };

        let config = Self {
            url,
            max_connections: env_parse("DB_MAX_CONNECTIONS")?
                .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
            min_connections: env_parse("DB_MIN_CONNECTIONS")?
                .unwrap_or(DEFAULT_DATABASE_MIN_CONNECTIONS),
            connect_timeout_secs: env_parse("DB_CONNECT_TIMEOUT")?
                .unwrap_or(DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS),
        };

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> IngestResult<()> {
        if self.url.is_empty() {
            return Err(IngestError::config("Database URL cannot be empty"));
        }

        if self.max_connections == 0 {
            return Err(IngestError::config(
                "Database max_connections must be greater than 0",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(IngestError::config(format!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }

        Ok(())
    }
}

fn url_from_parts() -> IngestResult<String> {
    let db = std::env::var("POSTGRES_DB").map_err(|_| {
        IngestError::config("Neither DATABASE_URL nor POSTGRES_DB is set")
    })?;
    let user = std::env::var("POSTGRES_USER").unwrap_or_else(|_| "postgres".to_string());
    let password = std::env::var("POSTGRES_PASSWORD").ok();
    let host = std::env::var("POSTGRES_HOST")
        .or_else(|_| std::env::var("HOST"))
        .unwrap_or_else(|_| "localhost".to_string());
    let port = match std::env::var("POSTGRES_PORT").or_else(|_| std::env::var("PORT")) {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|_| IngestError::config(format!("Invalid database port '{}'", raw)))?,
        Err(_) => DEFAULT_POSTGRES_PORT,
    };

    let credentials = match password {
        Some(password) => format!("{}:{}", user, password),
        None => user,
    };

    Ok(format!("postgresql://{}@{}:{}/{}", credentials, host, port, db))
}

fn env_parse<T: std::str::FromStr>(name: &str) -> IngestResult<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| IngestError::config(format!("Invalid value '{}' for {}", raw, name))),
        Err(_) => Ok(None),
    }
}
