//! # Client configuration: `saferide.toml`
//!
//! Read once at startup by the web entry point. Every field has a default, so a
//! missing or empty file is the default configuration.
//!
//! ## Structure
//!
//! ```toml
//! [backend]
//! url = "http://localhost:4943"
//!
//! [polling]
//! driver_location_ms = 3000
//! messages_ms = 5000
//! trip_status_ms = 5000
//! trip_requests_ms = 5000
//! query_max_age_ms = 30000
//!
//! [location]
//! throttle_ms = 5000
//! timeout_ms = 5000
//! maximum_age_ms = 0
//! high_accuracy = true
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`SafeRideConfig`] | Top-level config with builder helpers and TOML (de)serialisation. |
//! | [`BackendConfig`] | Base URL of the backend actor. |
//! | [`PollingConfig`] | Refetch intervals for polled queries. |
//! | [`LocationConfig`] | Forwarding throttle and position-watch options. |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeRideConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,
}

fn default_backend_url() -> String {
    "http://localhost:4943".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_driver_location_ms")]
    pub driver_location_ms: u64,
    #[serde(default = "default_messages_ms")]
    pub messages_ms: u64,
    #[serde(default = "default_trip_status_ms")]
    pub trip_status_ms: u64,
    /// Trip lists, polled only while one of their trips is live.
    #[serde(default = "default_trip_requests_ms")]
    pub trip_requests_ms: u64,
    /// Cached results older than this are refetched on the next read.
    #[serde(default = "default_query_max_age_ms")]
    pub query_max_age_ms: u64,
}

fn default_driver_location_ms() -> u64 {
    3000
}

fn default_messages_ms() -> u64 {
    5000
}

fn default_trip_status_ms() -> u64 {
    5000
}

fn default_trip_requests_ms() -> u64 {
    5000
}

fn default_query_max_age_ms() -> u64 {
    30_000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            driver_location_ms: default_driver_location_ms(),
            messages_ms: default_messages_ms(),
            trip_status_ms: default_trip_status_ms(),
            trip_requests_ms: default_trip_requests_ms(),
            query_max_age_ms: default_query_max_age_ms(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Minimum interval between forwarded location updates.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u32,
    #[serde(default)]
    pub maximum_age_ms: u32,
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,
}

fn default_throttle_ms() -> u64 {
    5000
}

fn default_timeout_ms() -> u32 {
    5000
}

fn default_high_accuracy() -> bool {
    true
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            timeout_ms: default_timeout_ms(),
            maximum_age_ms: 0,
            high_accuracy: default_high_accuracy(),
        }
    }
}

impl LocationConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

impl SafeRideConfig {
    /// Create a config pointing at the given backend.
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend: BackendConfig {
                url: backend_url.into(),
            },
            ..Default::default()
        }
    }

    /// Builder method to set the location forwarding throttle.
    pub fn with_throttle_ms(mut self, ms: u64) -> Self {
        self.location.throttle_ms = ms;
        self
    }

    /// Builder method to set the driver location poll interval.
    pub fn with_driver_location_poll_ms(mut self, ms: u64) -> Self {
        self.polling.driver_location_ms = ms;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "saferide.toml"
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
