mod config;
mod error;
mod reading_store;

use async_trait::async_trait;
use common::models::SensorReading;

pub use config::{StoreConfig, DEFAULT_INFLUXDB_URL};
pub use error::StoreError;
pub use reading_store::{reading_point, ReadingStore, LOCATION, MEASUREMENT};

/// Destination for validated sensor readings
#[async_trait]
pub trait ReadingSink: Send + Sync {
    /// Persist one reading, returning once the backend has acknowledged it
    async fn write_reading(&self, reading: &SensorReading) -> Result<(), StoreError>;
}
