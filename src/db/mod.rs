//! Database connection pool and the sightings data accessor.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::validate_table_name;
use crate::errors::AppError;
use crate::models::sighting::{Sighting, SightingRow, Snapshot};

/// Upper bound on waiting for a pooled connection during a refresh tick.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Create a PostgreSQL connection pool, connecting immediately.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Create a pool that opens connections on first use, so the server can
/// start while the store is still unreachable.
pub fn create_lazy_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(database_url)
}

/// Anything that can produce a full snapshot of the sightings table.
#[async_trait]
pub trait SightingSource: Send + Sync {
    /// Read every row of the table.
    async fn fetch_all(&self) -> Result<Snapshot, AppError>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Reads sightings from one PostgreSQL table.
#[derive(Debug, Clone)]
pub struct PgSightingStore {
    pool: PgPool,
    table: String,
}

impl PgSightingStore {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, AppError> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self { pool, table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn select_all(&self) -> String {
        format!("SELECT * FROM {}", self.table)
    }
}

#[async_trait]
impl SightingSource for PgSightingStore {
    async fn fetch_all(&self) -> Result<Snapshot, AppError> {
        // The pooled connection goes back to the pool when `conn` drops,
        // on success and on every error path.
        let mut conn = self.pool.acquire().await?;
        let query = self.select_all();
        let rows = sqlx::query_as::<_, SightingRow>(&query)
            .fetch_all(&mut *conn)
            .await?;

        tracing::debug!(table = %self.table, rows = rows.len(), "Fetched sightings");
        Ok(Snapshot::new(rows.into_iter().map(Sighting::from).collect()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
