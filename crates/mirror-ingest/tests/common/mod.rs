//! Shared fakes for pipeline tests

#![allow(dead_code)]

use async_trait::async_trait;
use mirror_common::{FetchResult, PersonRecord, PersonRow};
use mirror_ingest::error::{IngestError, IngestResult};
use mirror_ingest::source::{Fetched, Fetcher, RawPerson};
use mirror_ingest::store::{Store, StoreSession};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Initialize tracing for tests
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mirror_ingest=debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn person_name(id: u64) -> String {
    format!("person-{}", id)
}

type DelayFn = Box<dyn Fn(u64) -> Duration + Send + Sync>;

/// Deterministic fetcher: ids `1..=found_up_to` exist, everything after is
/// not found. Records concurrency and completion order.
pub struct FakeFetcher {
    found_up_to: u64,
    missing: HashSet<u64>,
    fail_on: Option<u64>,
    delay: DelayFn,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<u64>>,
    completions: Mutex<Vec<u64>>,
}

impl FakeFetcher {
    pub fn new(found_up_to: u64) -> Self {
        Self {
            found_up_to,
            missing: HashSet::new(),
            fail_on: None,
            delay: Box::new(|_| Duration::from_millis(1)),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            completions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: impl Fn(u64) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    pub fn with_missing(mut self, ids: &[u64]) -> Self {
        self.missing.extend(ids.iter().copied());
        self
    }

    pub fn failing_on(mut self, id: u64) -> Self {
        self.fail_on = Some(id);
        self
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<u64> {
        self.calls.lock().unwrap().clone()
    }

    pub fn completions(&self) -> Vec<u64> {
        self.completions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, id: u64) -> IngestResult<Fetched> {
        self.calls.lock().unwrap().push(id);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep((self.delay)(id)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completions.lock().unwrap().push(id);

        if self.fail_on == Some(id) {
            return Err(IngestError::UnexpectedStatus {
                id,
                status: reqwest::StatusCode::BAD_GATEWAY,
            });
        }

        if id > self.found_up_to || self.missing.contains(&id) {
            return Ok(FetchResult::NotFound);
        }

        Ok(FetchResult::Found(RawPerson {
            name: person_name(id),
            height: (150 + id).to_string(),
            ..Default::default()
        }))
    }
}

#[derive(Default)]
struct FakeStoreState {
    rows: Mutex<Vec<PersonRow>>,
    events: Mutex<Vec<String>>,
    slow: Mutex<HashMap<String, Duration>>,
    fail_on: Mutex<Option<String>>,
    sessions_opened: AtomicUsize,
    sessions_open: AtomicUsize,
}

/// In-memory store that keeps committed rows and an ordered event log
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<FakeStoreState>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the insert of `name` take `delay` before committing
    pub fn slow_on(self, name: &str, delay: Duration) -> Self {
        self.state
            .slow
            .lock()
            .unwrap()
            .insert(name.to_string(), delay);
        self
    }

    /// Make the insert of `name` fail
    pub fn failing_on(self, name: &str) -> Self {
        *self.state.fail_on.lock().unwrap() = Some(name.to_string());
        self
    }

    pub fn log(&self, event: impl Into<String>) {
        self.state.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.state.events.lock().unwrap().clone()
    }

    pub fn rows(&self) -> Vec<PersonRow> {
        self.state.rows.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.rows().into_iter().map(|r| r.name).collect()
    }

    pub fn sorted_names(&self) -> Vec<String> {
        let mut names = self.names();
        names.sort_by_key(|n| n.trim_start_matches("person-").parse::<u64>().unwrap_or(0));
        names
    }

    pub fn sessions_opened(&self) -> usize {
        self.state.sessions_opened.load(Ordering::SeqCst)
    }

    pub fn sessions_open(&self) -> usize {
        self.state.sessions_open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn create_schema(&self) -> IngestResult<()> {
        self.log("schema");
        Ok(())
    }

    async fn session(&self) -> IngestResult<Box<dyn StoreSession>> {
        self.state.sessions_opened.fetch_add(1, Ordering::SeqCst);
        self.state.sessions_open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeSession {
    state: Arc<FakeStoreState>,
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.state.sessions_open.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreSession for FakeSession {
    async fn insert(&mut self, record: &PersonRecord) -> IngestResult<()> {
        let delay = self.state.slow.lock().unwrap().get(&record.name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let should_fail = self.state.fail_on.lock().unwrap().as_deref() == Some(record.name.as_str());
        if should_fail {
            self.state
                .events
                .lock()
                .unwrap()
                .push(format!("failed:{}", record.name));
            return Err(IngestError::Database(sqlx::Error::RowNotFound));
        }

        self.state.rows.lock().unwrap().push(record.to_row());
        self.state
            .events
            .lock()
            .unwrap()
            .push(format!("insert:{}", record.name));
        Ok(())
    }
}
