use crate::{ReadingSink, StoreConfig, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::models::SensorReading;
use futures::stream;
use influxdb2::models::{health::Status, DataPoint};
use influxdb2::Client;
use tracing::{debug, info};

/// Measurement every reading is written under
pub const MEASUREMENT: &str = "sensores_pintura";

/// Value of the `local` tag; the service monitors a single site
pub const LOCATION: &str = "chao_fabrica";

pub struct ReadingStore {
    client: Client,
    config: StoreConfig,
}

impl ReadingStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        if !config.url.starts_with("http://") && !config.url.starts_with("https://") {
            return Err(StoreError::ClientError(format!(
                "InfluxDB URL must start with http:// or https://, got '{}'",
                config.url
            )));
        }

        let client = Client::new(&config.url, &config.org, &config.token);

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Probe the `/health` endpoint; anything but `pass` is an error.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        debug!("Checking InfluxDB health at {}", self.config.url);

        let health = self.client.health().await?;

        match health.status {
            Status::Pass => {
                info!(
                    "InfluxDB at {} is healthy (version {})",
                    self.config.url,
                    health.version.as_deref().unwrap_or("unknown")
                );
                Ok(())
            }
            _ => Err(StoreError::Unhealthy(
                health
                    .message
                    .unwrap_or_else(|| "health check did not pass".to_string()),
            )),
        }
    }
}

/// Build the point persisted for one reading, stamped with `at`.
pub fn reading_point(reading: &SensorReading, at: DateTime<Utc>) -> Result<DataPoint, StoreError> {
    let timestamp = at
        .timestamp_nanos_opt()
        .ok_or_else(|| StoreError::WriteError(format!("timestamp {} out of range", at)))?;

    let point = DataPoint::builder(MEASUREMENT)
        .tag("local", LOCATION)
        .field("nivel_tinta", reading.nivel)
        .field("temperatura", reading.temp)
        .field("umidade", reading.umid)
        .field("luminosidade", reading.luz)
        .field("presenca", reading.pres)
        .timestamp(timestamp)
        .build()?;

    Ok(point)
}

#[async_trait]
impl ReadingSink for ReadingStore {
    async fn write_reading(&self, reading: &SensorReading) -> Result<(), StoreError> {
        debug!("Storing reading in bucket {}: {:?}", self.config.bucket, reading);

        let point = reading_point(reading, Utc::now())?;

        self.client
            .write(&self.config.bucket, stream::iter(vec![point]))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use influxdb2::models::data_point::WriteDataPoint;

    fn line_protocol(point: &DataPoint) -> String {
        let mut buf = Vec::new();
        point.write_data_point_to(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn reading() -> SensorReading {
        SensorReading {
            nivel: 75.1,
            temp: 24.5,
            umid: 55.0,
            luz: 680,
            pres: true,
        }
    }

    fn config(url: &str) -> StoreConfig {
        StoreConfig {
            url: url.to_string(),
            token: "token".to_string(),
            org: "fabrica".to_string(),
            bucket: "pintura".to_string(),
        }
    }

    #[test]
    fn point_uses_fixed_measurement_and_tag() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let line = line_protocol(&reading_point(&reading(), at).unwrap());

        assert!(line.starts_with("sensores_pintura,local=chao_fabrica "), "{}", line);
    }

    #[test]
    fn point_fields_keep_their_types() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let line = line_protocol(&reading_point(&reading(), at).unwrap());

        assert_eq!(
            line.trim_end(),
            "sensores_pintura,local=chao_fabrica \
             luminosidade=680i,nivel_tinta=75.1,presenca=t,temperatura=24.5,umidade=55 \
             1714564800000000000"
        );
    }

    #[test]
    fn no_presence_is_written_as_false() {
        let mut r = reading();
        r.pres = false;
        let line = line_protocol(&reading_point(&r, Utc::now()).unwrap());
        assert!(line.contains(",presenca=f,"), "{}", line);
    }

    #[test]
    fn rejects_url_without_scheme() {
        let err = ReadingStore::new(config("localhost:8086")).err().unwrap();
        assert!(matches!(err, StoreError::ClientError(_)));
    }

    #[test]
    fn builds_client_for_valid_url() {
        let store = ReadingStore::new(config("http://localhost:8086")).unwrap();
        assert_eq!(store.config().bucket, "pintura");
    }
}
