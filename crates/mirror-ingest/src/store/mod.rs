//! Relational sink for mirrored people
//!
//! A [`Store`] hands out [`StoreSession`]s. Each persistence task acquires
//! its own session and drops it when done, so sessions are never shared
//! between tasks.

pub mod postgres;

use async_trait::async_trait;
use mirror_common::PersonRecord;

use crate::error::IngestResult;

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Create the person table if it does not exist yet
    async fn create_schema(&self) -> IngestResult<()>;

    /// Acquire a session for exclusive use by one persistence task
    ///
    /// The session is released when dropped, whether the task succeeded or
    /// not.
    async fn session(&self) -> IngestResult<Box<dyn StoreSession>>;
}

#[async_trait]
pub trait StoreSession: Send {
    /// Insert one record and commit it before returning
    async fn insert(&mut self, record: &PersonRecord) -> IngestResult<()>;
}
