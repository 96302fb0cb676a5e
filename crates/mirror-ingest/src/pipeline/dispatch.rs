//! Fire-and-forget persistence of batches

use mirror_common::{FetchResult, PersonRecord};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::debug;

use super::barrier::CompletionBarrier;
use crate::error::IngestResult;
use crate::source::Fetched;
use crate::store::Store;

/// Spawns one persistence task per batch and keeps every handle
///
/// `dispatch` never waits on earlier tasks. The number of outstanding
/// tasks is not capped; the store's pool size bounds how many of them hold
/// a session at once.
pub struct IngestDispatcher {
    store: Arc<dyn Store>,
    tasks: JoinSet<IngestResult<usize>>,
    dispatched: usize,
}

impl IngestDispatcher {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            tasks: JoinSet::new(),
            dispatched: 0,
        }
    }

    /// Start persisting `batch` in the background
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&mut self, batch: Vec<Fetched>) {
        let batch_no = self.dispatched;
        self.dispatched += 1;

        debug!(batch_no, size = batch.len(), "Dispatching persistence task");

        let store = Arc::clone(&self.store);
        self.tasks
            .spawn(async move { persist_batch(store.as_ref(), batch_no, batch).await });
    }

    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Stop dispatching and hand every tracked task to the barrier
    pub fn into_barrier(self) -> CompletionBarrier {
        CompletionBarrier::new(self.tasks, self.dispatched)
    }
}

/// Persist one batch through a dedicated session
///
/// Items are inserted in order, each committed on its own. The first
/// not-found marker ends the batch: neither it nor anything after it is
/// persisted. On error, records committed before the failure stay
/// committed. Returns the number of inserted records.
pub async fn persist_batch(
    store: &dyn Store,
    batch_no: usize,
    batch: Vec<Fetched>,
) -> IngestResult<usize> {
    let mut session = store.session().await?;
    let mut inserted = 0;

    for item in batch {
        let raw = match item {
            FetchResult::Found(raw) => raw,
            FetchResult::NotFound => {
                debug!(batch_no, inserted, "Not-found marker in batch, skipping the rest");
                break;
            },
        };

        session.insert(&PersonRecord::from(raw)).await?;
        inserted += 1;
    }

    debug!(batch_no, inserted, "Batch persisted");
    Ok(inserted)
}
