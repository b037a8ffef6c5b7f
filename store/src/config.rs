use crate::StoreError;
use std::fmt;

pub const DEFAULT_INFLUXDB_URL: &str = "http://localhost:8086";

/// Configuration for the InfluxDB store
#[derive(Clone)]
pub struct StoreConfig {
    /// InfluxDB server URL
    pub url: String,
    /// InfluxDB authentication token
    pub token: String,
    /// InfluxDB organization
    pub org: String,
    /// InfluxDB bucket readings are written to
    pub bucket: String,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl StoreConfig {
    /// Create a new store configuration from environment variables
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset. Every missing key is named in the error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = read("INFLUXDB_URL").unwrap_or_else(|| DEFAULT_INFLUXDB_URL.to_string());
        let token = read("INFLUXDB_TOKEN");
        let org = read("INFLUXDB_ORG");
        let bucket = read("INFLUXDB_BUCKET");

        match (token, org, bucket) {
            (Some(token), Some(org), Some(bucket)) => Ok(Self {
                url,
                token,
                org,
                bucket,
            }),
            (token, org, bucket) => {
                let missing: Vec<&str> = [
                    ("INFLUXDB_TOKEN", token.is_none()),
                    ("INFLUXDB_ORG", org.is_none()),
                    ("INFLUXDB_BUCKET", bucket.is_none()),
                ]
                .iter()
                .filter(|(_, absent)| *absent)
                .map(|(key, _)| *key)
                .collect();

                Err(StoreError::ConfigError(format!(
                    "environment variables not set: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn reads_all_values() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("INFLUXDB_URL", "http://influx:8086"),
            ("INFLUXDB_TOKEN", "secret"),
            ("INFLUXDB_ORG", "fabrica"),
            ("INFLUXDB_BUCKET", "pintura"),
        ]))
        .unwrap();

        assert_eq!(config.url, "http://influx:8086");
        assert_eq!(config.token, "secret");
        assert_eq!(config.org, "fabrica");
        assert_eq!(config.bucket, "pintura");
    }

    #[test]
    fn url_defaults_to_localhost() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("INFLUXDB_TOKEN", "secret"),
            ("INFLUXDB_ORG", "fabrica"),
            ("INFLUXDB_BUCKET", "pintura"),
        ]))
        .unwrap();

        assert_eq!(config.url, DEFAULT_INFLUXDB_URL);
    }

    #[test]
    fn missing_values_are_all_named() {
        let err = StoreConfig::from_lookup(lookup(&[("INFLUXDB_ORG", "fabrica")])).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, StoreError::ConfigError(_)));
        assert!(msg.contains("INFLUXDB_TOKEN"));
        assert!(msg.contains("INFLUXDB_BUCKET"));
        assert!(!msg.contains("INFLUXDB_ORG"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = StoreConfig::from_lookup(lookup(&[
            ("INFLUXDB_TOKEN", "  "),
            ("INFLUXDB_ORG", "fabrica"),
            ("INFLUXDB_BUCKET", "pintura"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("INFLUXDB_TOKEN"));
    }

    #[test]
    fn debug_hides_token() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("INFLUXDB_TOKEN", "super-secret-token"),
            ("INFLUXDB_ORG", "fabrica"),
            ("INFLUXDB_BUCKET", "pintura"),
        ]))
        .unwrap();
        assert!(!format!("{:?}", config).contains("super-secret-token"));
    }
}
