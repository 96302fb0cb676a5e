//! PgStore against a real PostgreSQL container
//!
//! Requires Docker. Run with `cargo test -- --ignored`.

mod common;

use anyhow::Result;
use common::{init_tracing, FakeFetcher};
use mirror_common::PersonRecord;
use mirror_ingest::config::{DbConfig, PipelineConfig};
use mirror_ingest::pipeline::{IdSource, IngestPipeline};
use mirror_ingest::store::{PgStore, Store};
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

async fn start_store() -> Result<(ContainerAsync<Postgres>, PgStore)> {
    let container = Postgres::default().with_tag("16-alpine").start().await?;

    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let mut config = DbConfig::new(format!(
        "postgresql://postgres:postgres@{}:{}/postgres",
        host, port
    ));
    config.max_connections = 4;

    let store = PgStore::connect(&config).await?;
    store.create_schema().await?;

    Ok((container, store))
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_schema_is_idempotent() -> Result<()> {
    init_tracing();
    let (_container, store) = start_store().await?;

    store.create_schema().await?;
    assert_eq!(store.count().await?, 0);

    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_empty_lists_round_trip() -> Result<()> {
    let (_container, store) = start_store().await?;

    let record = PersonRecord {
        name: "IG-88".to_string(),
        gender: "none".to_string(),
        height: "200".to_string(),
        mass: "140".to_string(),
        films: vec!["https://swapi.dev/api/films/2/".to_string()],
        ..Default::default()
    };

    let mut session = store.session().await?;
    session.insert(&record).await?;
    drop(session);

    let (species, vehicles): (Option<String>, Option<String>) =
        sqlx::query_as("SELECT species, vehicles FROM person")
            .fetch_one(store.pool())
            .await?;
    assert_eq!(species.as_deref(), Some(""));
    assert_eq!(vehicles.as_deref(), Some(""));

    let stored = store.all().await?;
    assert_eq!(stored, vec![record]);

    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_people_are_allowed() -> Result<()> {
    let (_container, store) = start_store().await?;
    let record = PersonRecord {
        name: "Clone Trooper".to_string(),
        ..Default::default()
    };

    let mut session = store.session().await?;
    session.insert(&record).await?;
    session.insert(&record).await?;

    assert_eq!(store.count().await?, 2);
    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_pipeline_into_postgres() -> Result<()> {
    init_tracing();
    let (_container, store) = start_store().await?;

    let fetcher = Arc::new(FakeFetcher::new(9));
    let config = PipelineConfig {
        source_url: "http://fake.invalid/people".to_string(),
        fetch_batch_size: 4,
        ingest_batch_size: 3,
    };

    let report = IngestPipeline::new(fetcher, Arc::new(store.clone()), config)
        .run(IdSource::unbounded())
        .await?;

    assert_eq!(report.persisted, 9);
    assert_eq!(store.count().await?, 9);
    Ok(())
}
