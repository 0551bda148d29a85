pub mod memory;
pub mod postgres;

use appliance_client::domain::{NewReading, Reading};

use crate::error::StorageError;

pub use memory::MemoryReadingStore;
pub use postgres::PgReadingStore;

/// Append-only persistence for readings.
#[async_trait::async_trait]
pub trait ReadingStore: Send + Sync {
    /// Append one reading, returning it as stored.
    async fn insert_reading(&self, reading: NewReading) -> Result<Reading, StorageError>;

    /// Readings ordered by appliance name then timestamp.
    async fn query_readings(
        &self,
        appliance_name: Option<&str>,
    ) -> Result<Vec<Reading>, StorageError>;
}
