//! Bounded-concurrency batched fetching

use futures::future::try_join_all;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::debug;

use super::ids::IdSource;
use crate::error::{IngestError, IngestResult};
use crate::source::{Fetched, Fetcher};

/// Fetch ids in consecutive groups of `group_size`
///
/// Every id of a group is requested concurrently and the whole group is
/// joined before the next one starts, so at most `group_size` fetches are
/// in flight. Results come out in id order: within a group by position,
/// across groups by submission. A failed fetch surfaces as an `Err` item
/// and the consumer is expected to stop there.
pub fn fetch_stage<'a>(
    fetcher: &'a dyn Fetcher,
    ids: IdSource,
    group_size: usize,
) -> BoxStream<'a, IngestResult<Fetched>> {
    let group_size = group_size.max(1);

    stream::unfold((ids, 0usize), move |(mut ids, group_no)| async move {
        let group: Vec<u64> = ids.by_ref().take(group_size).collect();
        let first_id = *group.first()?;

        debug!(group_no, first_id, size = group.len(), "Fetch group started");
        let results = try_join_all(group.iter().map(|&id| fetcher.fetch(id))).await;
        debug!(group_no, ok = results.is_ok(), "Fetch group finished");

        Some((results, (ids, group_no + 1)))
    })
    .map_ok(|results| stream::iter(results.into_iter().map(Ok::<_, IngestError>)))
    .try_flatten()
    .boxed()
}
