//! Remote people source
//!
//! Implement [`Fetcher`] for anything that can resolve a numeric id to a
//! person. [`SwapiFetcher`] is the HTTP implementation used by the binary.

pub mod models;
pub mod swapi;

use async_trait::async_trait;
use mirror_common::FetchResult;

use crate::error::IngestResult;

pub use models::RawPerson;
pub use swapi::SwapiFetcher;

/// Fetch outcome carried through the pipeline
pub type Fetched = FetchResult<RawPerson>;

/// Resolves one id against the remote source
///
/// Implementations map a well-defined "not found" answer to
/// [`FetchResult::NotFound`] and fail on everything else. The pipeline
/// calls `fetch` concurrently on a shared reference, so any connection pool
/// inside must be safe to share.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, id: u64) -> IngestResult<Fetched>;
}
