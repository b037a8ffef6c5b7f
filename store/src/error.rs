use influxdb2::models::data_point::DataPointError;
use thiserror::Error;

/// Failures talking to, or preparing data for, InfluxDB
#[derive(Error, Debug)]
pub enum StoreError {
    /// The client could not be built from the configured URL
    #[error("InfluxDB client error: {0}")]
    ClientError(String),

    /// A reading could not be turned into a point (bad field or timestamp)
    #[error("InfluxDB write error: {0}")]
    WriteError(String),

    /// Required connection settings are missing
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// `/health` answered, but not with `pass`
    #[error("InfluxDB is not healthy: {0}")]
    Unhealthy(String),

    /// Transport failure or non-success HTTP status from the server
    #[error("InfluxDB error: {0}")]
    InfluxDbError(String),
}

impl From<StoreError> for common::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConfigError(msg) => common::Error::ConfigError(msg),
            other => common::Error::DbError(other.to_string()),
        }
    }
}

impl From<influxdb2::RequestError> for StoreError {
    fn from(err: influxdb2::RequestError) -> Self {
        StoreError::InfluxDbError(err.to_string())
    }
}

impl From<DataPointError> for StoreError {
    fn from(err: DataPointError) -> Self {
        StoreError::WriteError(err.to_string())
    }
}
