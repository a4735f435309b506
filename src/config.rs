/*!
 * Configuration
 * Collector sizing and identity settings with environment overrides
 */

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::limits::{
    DEFAULT_APP_ID, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_NAME, ENV_APP_ID, ENV_QUEUE_CAPACITY,
    MAX_QUEUE_CAPACITY,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Telemetry pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TelemetryConfig {
    /// Bounded queue capacity between producers and the aggregation worker
    pub queue_capacity: usize,
    /// Application id keying the installation identifier
    pub app_id: String,
    /// Aggregation worker thread name
    pub worker_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            app_id: DEFAULT_APP_ID.to_string(),
            worker_name: DEFAULT_WORKER_NAME.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Defaults overridden by `TELEMETRY_QUEUE_CAPACITY` and `TELEMETRY_APP_ID`
    ///
    /// Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_QUEUE_CAPACITY) {
            match parse_capacity(&raw) {
                Ok(capacity) => config.queue_capacity = capacity,
                Err(e) => warn!(error = %e, "ignoring queue capacity override"),
            }
        }

        if let Some(app_id) = lookup(ENV_APP_ID) {
            let app_id = app_id.trim();
            if app_id.is_empty() {
                warn!(error = %ConfigError::EmptyAppId, "ignoring app id override");
            } else {
                config.app_id = app_id.to_string();
            }
        }

        config
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::InvalidValue {
                key: ENV_QUEUE_CAPACITY,
                value: self.queue_capacity.to_string(),
            });
        }
        if self.app_id.trim().is_empty() {
            return Err(ConfigError::EmptyAppId);
        }
        Ok(())
    }
}

fn parse_capacity(raw: &str) -> ConfigResult<usize> {
    let invalid = || ConfigError::InvalidValue {
        key: ENV_QUEUE_CAPACITY,
        value: raw.to_string(),
    };
    let capacity: usize = raw.trim().parse().map_err(|_| invalid())?;
    match capacity {
        0 => Err(ConfigError::ZeroCapacity),
        c if c > MAX_QUEUE_CAPACITY => Err(invalid()),
        c => Ok(c),
    }
}
