//! Page controller configuration.
//! Read from environment variables with defaults.

use std::time::Duration;

use crate::error::{ClientError, ClientResult};

const DEFAULT_PRELOAD_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1596436889106-be35e843f975?w=300&h=200&fit=crop&auto=format&q=80",
    "https://images.unsplash.com/photo-1524231757912-21f4fe3a7200?w=300&h=200&fit=crop&auto=format&q=80",
];

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the booking backend
    pub backend: String,
    /// Skip TLS certificate verification
    pub ignore_cert: bool,
    /// Optional HTTP timeout; image loads have none by default
    pub timeout_ms: Option<u64>,
    /// Window of the scroll/resize throttle
    pub scan_throttle_ms: u64,
    /// Cache size above which the sweep evicts
    pub cache_capacity: usize,
    /// Entries evicted per sweep
    pub cache_evict_batch: usize,
    /// Period of the cache sweep
    pub cache_sweep_secs: u64,
    /// Text shown over the fallback gradient
    pub fallback_label: String,
    /// Images warmed into the cache at DOM ready
    pub preload_images: Vec<String>,
    /// Background worker script
    pub service_worker: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: "http://localhost:5000".into(),
            ignore_cert: false,
            timeout_ms: None,
            scan_throttle_ms: 100,
            cache_capacity: 50,
            cache_evict_batch: 10,
            cache_sweep_secs: 24 * 60 * 60,
            fallback_label: "Sochi".into(),
            preload_images: DEFAULT_PRELOAD_IMAGES.iter().map(|s| s.to_string()).collect(),
            service_worker: "/sw.js".into(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> ClientResult<Self> {
        let defaults = Self::default();
        let config = Self {
            backend: std::env::var("FLIGHT_BACKEND")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend),
            ignore_cert: std::env::var("FLIGHT_IGNORE_CERT")
                .map(|v| v == "true")
                .unwrap_or(false),
            timeout_ms: std::env::var("FLIGHT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
            scan_throttle_ms: parse_env("FLIGHT_SCAN_THROTTLE_MS").unwrap_or(defaults.scan_throttle_ms),
            cache_capacity: parse_env("FLIGHT_CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            cache_evict_batch: parse_env("FLIGHT_CACHE_EVICT_BATCH")
                .unwrap_or(defaults.cache_evict_batch),
            cache_sweep_secs: parse_env("FLIGHT_CACHE_SWEEP_SECS").unwrap_or(defaults.cache_sweep_secs),
            fallback_label: std::env::var("FLIGHT_FALLBACK_LABEL").unwrap_or(defaults.fallback_label),
            preload_images: std::env::var("FLIGHT_PRELOAD_IMAGES")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.preload_images),
            service_worker: defaults.service_worker,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the timers and the cache cannot run with.
    pub fn validate(&self) -> ClientResult<()> {
        if self.cache_sweep_secs == 0 {
            return Err(ClientError::config("FLIGHT_CACHE_SWEEP_SECS must be at least 1"));
        }
        if self.cache_evict_batch == 0 {
            return Err(ClientError::config("FLIGHT_CACHE_EVICT_BATCH must be at least 1"));
        }
        Ok(())
    }

    pub fn scan_throttle(&self) -> Duration {
        Duration::from_millis(self.scan_throttle_ms)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
