//! Regrouping fetched items into persistence batches

use futures::{Stream, StreamExt};
use tracing::{info, warn};

use crate::error::IngestResult;
use crate::source::Fetched;

/// Pulls fetched items and hands them out in batches of `batch_size`
///
/// Not-found markers are counted across the whole run. Once `batch_size`
/// of them have been seen the stage emits whatever is buffered, even a
/// short batch, and ends without pulling more input.
///
/// A short buffer left over when the input simply runs out is discarded
/// rather than emitted. Callers see the discarded count via
/// [`RechunkStage::dropped`].
pub struct RechunkStage<S> {
    input: S,
    batch_size: usize,
    not_found_seen: usize,
    dropped: usize,
    threshold_reached: bool,
    finished: bool,
}

impl<S> RechunkStage<S>
where
    S: Stream<Item = IngestResult<Fetched>> + Unpin,
{
    pub fn new(input: S, batch_size: usize) -> Self {
        Self {
            input,
            batch_size: batch_size.max(1),
            not_found_seen: 0,
            dropped: 0,
            threshold_reached: false,
            finished: false,
        }
    }

    /// Next persistence batch, or `None` once the stream is over
    ///
    /// An upstream error is returned as-is and ends the stage.
    pub async fn next_batch(&mut self) -> IngestResult<Option<Vec<Fetched>>> {
        if self.finished {
            return Ok(None);
        }

        let mut buffer = Vec::with_capacity(self.batch_size);

        while let Some(item) = self.input.next().await {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                },
            };

            if item.is_not_found() {
                self.not_found_seen += 1;
            }
            buffer.push(item);

            if self.not_found_seen >= self.batch_size {
                info!(
                    not_found = self.not_found_seen,
                    final_batch = buffer.len(),
                    "Not-found threshold reached, ending stream"
                );
                self.threshold_reached = true;
                self.finished = true;
                return Ok(Some(buffer));
            }

            if buffer.len() == self.batch_size {
                return Ok(Some(buffer));
            }
        }

        self.finished = true;
        if !buffer.is_empty() {
            self.dropped = buffer.len();
            warn!(
                dropped = buffer.len(),
                batch_size = self.batch_size,
                "Input ended on a partial batch; trailing items were not persisted"
            );
        }

        Ok(None)
    }

    pub fn not_found_seen(&self) -> usize {
        self.not_found_seen
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn threshold_reached(&self) -> bool {
        self.threshold_reached
    }
}
