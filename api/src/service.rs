use common::{models::SensorReading, Error, Result};
use std::sync::Arc;
use std::time::Duration;
use store::ReadingSink;
use tokio::time::timeout;
use tracing::{error, info};

/// Service that persists validated readings, one acknowledged write each
pub struct IngestService {
    /// Backing store for readings
    sink: Arc<dyn ReadingSink>,
    /// Maximum time a single write may take
    write_timeout: Duration,
}

impl IngestService {
    pub fn new(sink: Arc<dyn ReadingSink>, write_timeout: Duration) -> Self {
        Self {
            sink,
            write_timeout,
        }
    }

    /// Write one reading and wait for the store to acknowledge it
    pub async fn record(&self, reading: &SensorReading) -> Result<()> {
        match timeout(self.write_timeout, self.sink.write_reading(reading)).await {
            Ok(Ok(())) => {
                info!("Reading stored in InfluxDB");
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Failed to store reading: {}", e);
                Err(e.into())
            }
            Err(_) => {
                error!("Store write timed out after {:?}", self.write_timeout);
                Err(Error::Timeout(self.write_timeout))
            }
        }
    }
}
