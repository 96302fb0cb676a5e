//! Waiting out every dispatched persistence task

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::error::{IngestError, IngestResult};

/// Final synchronization point of a run
///
/// [`CompletionBarrier::wait`] joins every task, in completion order, and
/// only returns after the last one has finished. Failures do not
/// short-circuit the wait: each one is logged, and the first one observed
/// is returned together with the failure count.
pub struct CompletionBarrier {
    tasks: JoinSet<IngestResult<usize>>,
    total: usize,
}

impl CompletionBarrier {
    pub fn new(tasks: JoinSet<IngestResult<usize>>, total: usize) -> Self {
        Self { tasks, total }
    }

    /// Tasks still running or not yet joined
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Returns the total number of records persisted by all tasks
    pub async fn wait(mut self) -> IngestResult<usize> {
        let mut persisted = 0;
        let mut failed = 0;
        let mut first_failure = None;

        info!(tasks = self.tasks.len(), "Waiting for persistence tasks");

        while let Some(joined) = self.tasks.join_next().await {
            let failure = match joined {
                Ok(Ok(inserted)) => {
                    persisted += inserted;
                    continue;
                },
                Ok(Err(e)) => {
                    error!(error = %e, "Persistence task failed");
                    e
                },
                Err(e) => {
                    error!(error = %e, "Persistence task panicked");
                    IngestError::TaskPanicked(e.to_string())
                },
            };

            failed += 1;
            first_failure.get_or_insert(failure);
        }

        match first_failure {
            None => {
                info!(tasks = self.total, persisted, "All persistence tasks finished");
                Ok(persisted)
            },
            Some(first) => Err(IngestError::PersistenceFailed {
                failed,
                total: self.total,
                first: Box::new(first),
            }),
        }
    }
}
