//! Concurrent fetch-and-ingest pipeline
//!
//! ```text
//! IdSource -> fetch_stage -> RechunkStage -> IngestDispatcher -> Store
//!                                                  |
//!                                          CompletionBarrier
//! ```
//!
//! Fetching proceeds one group at a time. Persistence runs in background
//! tasks that overlap with further fetching. [`IngestPipeline::run`] only
//! returns once every persistence task has finished.

pub mod barrier;
pub mod dispatch;
pub mod fetch;
pub mod ids;
pub mod rechunk;

use std::sync::Arc;
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::error::IngestResult;
use crate::source::Fetcher;
use crate::store::Store;

pub use barrier::CompletionBarrier;
pub use dispatch::{persist_batch, IngestDispatcher};
pub use fetch::fetch_stage;
pub use ids::IdSource;
pub use rechunk::RechunkStage;

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Persistence tasks dispatched
    pub batches: usize,
    /// Records committed across all tasks
    pub persisted: usize,
    /// Trailing items discarded because they never filled a batch
    pub dropped: usize,
    /// Whether the run ended on the not-found threshold
    pub threshold_reached: bool,
}

pub struct IngestPipeline {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn Store>,
    config: PipelineConfig,
}

impl IngestPipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, store: Arc<dyn Store>, config: PipelineConfig) -> Self {
        Self {
            fetcher,
            store,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Mirror every id from `ids` into the store
    ///
    /// A fetch failure stops the pipeline, but tasks already dispatched are
    /// still awaited before the fetch error is returned.
    pub async fn run(&self, ids: IdSource) -> IngestResult<IngestReport> {
        info!(
            fetch_batch_size = self.config.fetch_batch_size,
            ingest_batch_size = self.config.ingest_batch_size,
            "Ingest run started"
        );

        let fetched = fetch_stage(self.fetcher.as_ref(), ids, self.config.fetch_batch_size);
        let mut rechunk = RechunkStage::new(fetched, self.config.ingest_batch_size);
        let mut dispatcher = IngestDispatcher::new(Arc::clone(&self.store));

        let upstream = loop {
            match rechunk.next_batch().await {
                Ok(Some(batch)) => dispatcher.dispatch(batch),
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        let batches = dispatcher.dispatched();
        let persisted = dispatcher.into_barrier().wait().await;

        match (upstream, persisted) {
            (Err(fetch_err), persisted) => {
                if let Err(e) = persisted {
                    error!(error = %e, "Persistence also failed after fetch error");
                }
                Err(fetch_err)
            },
            (Ok(()), Err(e)) => Err(e),
            (Ok(()), Ok(persisted)) => {
                let report = IngestReport {
                    batches,
                    persisted,
                    dropped: rechunk.dropped(),
                    threshold_reached: rechunk.threshold_reached(),
                };
                info!(
                    batches = report.batches,
                    persisted = report.persisted,
                    dropped = report.dropped,
                    threshold_reached = report.threshold_reached,
                    "Ingest run finished"
                );
                Ok(report)
            },
        }
    }
}
