use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
#[error("Invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    key: String,
    value: String,
    reason: String,
}

pub struct StoreConfig {
    pub port: u16,
    pub score_file: PathBuf,
}

impl StoreConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("STORE_PORT", "5000")?,
            score_file: try_load("SCORE_FILE", "scores.txt")?,
        })
    }
}

pub struct ProxyConfig {
    pub port: u16,
    pub store_url: String,
    pub upstream_timeout: Duration,
}

impl ProxyConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let store_url: String = try_load("STORE_URL", "http://10.0.28.54:5000")?;

        Ok(Self {
            port: try_load("PROXY_PORT", "8080")?,
            store_url: store_url.trim_end_matches('/').to_string(),
            upstream_timeout: Duration::from_secs(try_load("UPSTREAM_TIMEOUT_SECS", "5")?),
        })
    }

    pub fn scores_url(&self) -> String {
        format!("{}/api/scores", self.store_url)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");

        ConfigError {
            key: key.to_string(),
            reason: e.to_string(),
            value,
        }
    })
}
