//! SWAPI Mirror Ingest Library
//!
//! Mirrors the SWAPI people collection into PostgreSQL.
//!
//! Ids `1..=N` are fetched in small concurrent groups, regrouped into
//! persistence batches, and written by background tasks that are all
//! awaited before a run completes. A run of not-found answers marks the end
//! of the data.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mirror_ingest::config::{DbConfig, PipelineConfig};
//! use mirror_ingest::pipeline::{IdSource, IngestPipeline};
//! use mirror_ingest::source::SwapiFetcher;
//! use mirror_ingest::store::{PgStore, Store};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::default();
//!     let store = PgStore::connect(&DbConfig::from_env()?).await?;
//!     store.create_schema().await?;
//!
//!     let fetcher = SwapiFetcher::new(config.source_url.clone())?;
//!     let pipeline = IngestPipeline::new(Arc::new(fetcher), Arc::new(store), config);
//!     let report = pipeline.run(IdSource::bounded(20)).await?;
//!     tracing::info!(persisted = report.persisted, "done");
//!     Ok(())
//! }
//! ```
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod store;

pub use error::{IngestError, IngestResult};
