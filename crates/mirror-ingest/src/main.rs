//! swapi-mirror - copy SWAPI people into PostgreSQL

use anyhow::Result;
use clap::Parser;
use mirror_common::logging::{init_logging, LogConfig, LogLevel};
use mirror_ingest::config::{DbConfig, PipelineConfig};
use mirror_ingest::pipeline::{IdSource, IngestPipeline};
use mirror_ingest::source::SwapiFetcher;
use mirror_ingest::store::{PgStore, Store};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "swapi-mirror")]
#[command(author, version, about = "Mirror SWAPI people into PostgreSQL")]
struct Cli {
    /// Number of ids to fetch, starting at 1. Without it the run continues
    /// until the source stops returning people.
    #[arg(env = "MIRROR_COUNT")]
    count: Option<u64>,

    /// Ids fetched concurrently per group (overrides FETCH_BATCH_SIZE)
    #[arg(long)]
    fetch_batch_size: Option<usize>,

    /// Items per persistence task (overrides INGEST_BATCH_SIZE)
    #[arg(long)]
    ingest_batch_size: Option<usize>,

    /// People endpoint (overrides SWAPI_URL)
    #[arg(long)]
    source_url: Option<String>,

    /// Do not create the person table before ingesting
    #[arg(long)]
    skip_schema: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::from_env()?;

        if let Some(size) = self.fetch_batch_size {
            config.fetch_batch_size = size;
        }
        if let Some(size) = self.ingest_batch_size {
            config.ingest_batch_size = size;
        }
        if let Some(ref url) = self.source_url {
            config.source_url = url.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over the flag
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("swapi-mirror")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    let started = Instant::now();
    let config = cli.pipeline_config()?;

    let store = PgStore::connect(&DbConfig::from_env()?).await?;
    if !cli.skip_schema {
        store.create_schema().await?;
    }

    let fetcher = SwapiFetcher::new(config.source_url.clone())?;
    let ids = match cli.count {
        Some(count) => IdSource::bounded(count),
        None => IdSource::unbounded(),
    };

    info!(count = ?cli.count, source = %config.source_url, "Mirroring people");

    let pipeline = IngestPipeline::new(Arc::new(fetcher), Arc::new(store), config);

    match pipeline.run(ids).await {
        Ok(report) => {
            info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                persisted = report.persisted,
                batches = report.batches,
                "done"
            );
            Ok(())
        },
        Err(e) => {
            error!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "Ingest run failed"
            );
            Err(e.into())
        },
    }
}
