use async_trait::async_trait;
use common::models::SensorReading;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use store::{ReadingSink, StoreError};

/// In-memory sink standing in for InfluxDB
pub struct MemorySink {
    written: Mutex<Vec<SensorReading>>,
    failing: AtomicBool,
    delay: Option<Duration>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            written: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            delay: None,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn written(&self) -> Vec<SensorReading> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReadingSink for MemorySink {
    async fn write_reading(&self, reading: &SensorReading) -> Result<(), StoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::InfluxDbError("connection refused".to_string()));
        }
        self.written.lock().unwrap().push(reading.clone());
        Ok(())
    }
}
