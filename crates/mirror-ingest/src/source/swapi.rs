//! HTTP fetcher for the SWAPI people endpoint

use async_trait::async_trait;
use mirror_common::FetchResult;
use reqwest::{Client, StatusCode};
use tracing::{debug, trace};

use super::models::PersonPayload;
use super::{Fetched, Fetcher};
use crate::error::{IngestError, IngestResult};

/// Fetches people over HTTP with one shared connection pool
///
/// The client is built without a request timeout: a stalled response stalls
/// its fetch group.
#[derive(Debug, Clone)]
pub struct SwapiFetcher {
    client: Client,
    base_url: String,
}

impl SwapiFetcher {
    pub fn new(base_url: impl Into<String>) -> IngestResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("swapi-mirror/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn person_url(&self, id: u64) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), id)
    }
}

#[async_trait]
impl Fetcher for SwapiFetcher {
    async fn fetch(&self, id: u64) -> IngestResult<Fetched> {
        let url = self.person_url(id);
        trace!(id, url = %url, "Fetch started");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(id, "Person not found");
            return Ok(FetchResult::NotFound);
        }

        if !status.is_success() {
            return Err(IngestError::UnexpectedStatus { id, status });
        }

        let payload: PersonPayload = response.json().await?;
        let person = payload.into_person();

        debug!(id, name = %person.name, "Fetch finished");

        Ok(FetchResult::Found(person))
    }
}
