use appliance_client::db::reading_queries;
use appliance_client::domain::{NewReading, Reading};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::StorageError;
use crate::store::ReadingStore;

pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(uri: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(uri)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for in-flight queries and release every connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl ReadingStore for PgReadingStore {
    async fn insert_reading(&self, reading: NewReading) -> Result<Reading, StorageError> {
        Ok(reading_queries::insert_reading(&self.pool, &reading).await?)
    }

    async fn query_readings(
        &self,
        appliance_name: Option<&str>,
    ) -> Result<Vec<Reading>, StorageError> {
        let rows = reading_queries::query_readings(&self.pool, appliance_name).await?;
        tracing::debug!(rows = rows.len(), "loaded readings");
        Ok(rows)
    }
}
