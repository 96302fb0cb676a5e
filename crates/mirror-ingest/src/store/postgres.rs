//! PostgreSQL store backed by a `sqlx` connection pool

use async_trait::async_trait;
use mirror_common::{PersonRecord, PersonRow};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Connection, Postgres};
use std::time::Duration;

use super::{Store, StoreSession};
use crate::config::DbConfig;
use crate::error::IngestResult;

/// Person table, keyed by a surrogate serial id only. The SWAPI id is not
/// stored and nothing besides the primary key is unique.
const CREATE_PERSON_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS person (
    id          SERIAL PRIMARY KEY,
    name        VARCHAR(100) NOT NULL,
    gender      TEXT NOT NULL,
    hair_color  TEXT NOT NULL,
    eye_color   TEXT NOT NULL,
    skin_color  TEXT NOT NULL,
    birth_year  TEXT NOT NULL,
    homeworld   TEXT NOT NULL,
    height      TEXT NOT NULL,
    mass        TEXT NOT NULL,
    films       TEXT NOT NULL,
    species     TEXT NOT NULL,
    starships   TEXT NOT NULL,
    vehicles    TEXT NOT NULL
)
"#;

const INSERT_PERSON: &str = r#"
INSERT INTO person (
    name, gender, hair_color, eye_color, skin_color, birth_year,
    homeworld, height, mass, films, species, starships, vehicles
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
"#;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DbConfig) -> IngestResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database connection pool created"
        );

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn count(&self) -> IngestResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM person")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// All persisted people, in insertion order
    pub async fn all(&self) -> IngestResult<Vec<PersonRecord>> {
        let rows: Vec<(
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
        )> = sqlx::query_as(
            r#"
            SELECT name, gender, hair_color, eye_color, skin_color, birth_year,
                   homeworld, height, mass, films, species, starships, vehicles
            FROM person
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                PersonRecord::from(PersonRow {
                    name: r.0,
                    gender: r.1,
                    hair_color: r.2,
                    eye_color: r.3,
                    skin_color: r.4,
                    birth_year: r.5,
                    homeworld: r.6,
                    height: r.7,
                    mass: r.8,
                    films: r.9,
                    species: r.10,
                    starships: r.11,
                    vehicles: r.12,
                })
            })
            .collect())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_schema(&self) -> IngestResult<()> {
        sqlx::query(CREATE_PERSON_TABLE)
            .execute(&self.pool)
            .await?;

        tracing::info!("Person table ready");
        Ok(())
    }

    async fn session(&self) -> IngestResult<Box<dyn StoreSession>> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgSession { conn }))
    }
}

/// One pooled connection, returned to the pool on drop
pub struct PgSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl StoreSession for PgSession {
    async fn insert(&mut self, record: &PersonRecord) -> IngestResult<()> {
        let row = record.to_row();
        let mut tx = self.conn.begin().await?;

        sqlx::query(INSERT_PERSON)
            .bind(&row.name)
            .bind(&row.gender)
            .bind(&row.hair_color)
            .bind(&row.eye_color)
            .bind(&row.skin_color)
            .bind(&row.birth_year)
            .bind(&row.homeworld)
            .bind(&row.height)
            .bind(&row.mass)
            .bind(&row.films)
            .bind(&row.species)
            .bind(&row.starships)
            .bind(&row.vehicles)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
