use common::{Error, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single store write, and on the startup health probe
    pub write_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            write_timeout: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = read("API_HOST").unwrap_or(defaults.host);

        let port = match read("API_PORT") {
            Some(p) => p.parse().map_err(|_| {
                Error::ConfigError(format!("API_PORT must be a port number, got '{}'", p))
            })?,
            None => defaults.port,
        };

        let write_timeout = match read("STORE_WRITE_TIMEOUT_SECS") {
            Some(s) => match s.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(Error::ConfigError(format!(
                        "STORE_WRITE_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
                        s
                    )))
                }
            },
            None => defaults.write_timeout,
        };

        Ok(Self {
            host,
            port,
            write_timeout,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
