//! Filter store configuration with validation.
//!
//! # Example
//!
//! ```ignore
//! use qc_filter_store::FilterStoreConfig;
//! use std::time::Duration;
//!
//! let config = FilterStoreConfig::default()
//!     .with_max_filters(500)
//!     .with_filter_ttl(Duration::from_secs(3600));
//! config.validate()?;
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of filters a store will accept.
pub const DEFAULT_MAX_FILTERS: usize = 100;

/// Default number of results a filter buffers before dropping the oldest.
pub const DEFAULT_MAX_RESULTS: usize = 10_000;

/// Filter store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterStoreConfig {
    /// Maximum number of filters registered at once
    pub max_filters: usize,
    /// A filter not polled for this long is stale and gets reaped
    #[serde(with = "humantime_serde")]
    pub filter_ttl: Duration,
    /// How often the reaper scans for stale filters
    #[serde(with = "humantime_serde")]
    pub reap_interval: Duration,
    /// Maximum buffered results per filter
    pub max_results: usize,
}

impl Default for FilterStoreConfig {
    fn default() -> Self {
        Self {
            max_filters: DEFAULT_MAX_FILTERS,
            filter_ttl: Duration::from_secs(24 * 60 * 60),
            reap_interval: Duration::from_secs(60),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl FilterStoreConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_filters == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        if self.max_results == 0 {
            return Err(ConfigError::ZeroResults);
        }

        if self.filter_ttl.is_zero() {
            return Err(ConfigError::ZeroTtl);
        }

        // A sweep interval longer than the TTL lets filters outlive it
        if self.reap_interval.is_zero() || self.reap_interval > self.filter_ttl {
            return Err(ConfigError::InvalidReapInterval {
                interval: self.reap_interval,
                ttl: self.filter_ttl,
            });
        }

        Ok(())
    }

    pub fn with_max_filters(mut self, max_filters: usize) -> Self {
        self.max_filters = max_filters;
        self
    }

    pub fn with_filter_ttl(mut self, ttl: Duration) -> Self {
        self.filter_ttl = ttl;
        self
    }

    pub fn with_reap_interval(mut self, interval: Duration) -> Self {
        self.reap_interval = interval;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Durations as `"90s"`, `"500ms"`, `"250us"`, `"10ns"`, `"15m"`, `"24h"` or
/// plain seconds. Serialization uses the coarsest unit that loses nothing.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    const NANOS_PER_SEC: u128 = 1_000_000_000;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = duration.subsec_nanos();
        let s = if nanos == 0 {
            format!("{}s", duration.as_secs())
        } else if nanos % 1_000_000 == 0 {
            format!("{}ms", duration.as_millis())
        } else if nanos % 1_000 == 0 {
            format!("{}us", duration.as_micros())
        } else {
            format!("{}ns", duration.as_nanos())
        };
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // Sub-second suffixes end in 's' and must be checked first
        if let Some(ns) = s.strip_suffix("ns") {
            parse_scaled(ns, 1)
        } else if let Some(us) = s.strip_suffix("us") {
            parse_scaled(us, 1_000)
        } else if let Some(ms) = s.strip_suffix("ms") {
            parse_scaled(ms, 1_000_000)
        } else if let Some(secs) = s.strip_suffix('s') {
            parse_secs(secs, 1)
        } else if let Some(mins) = s.strip_suffix('m') {
            parse_secs(mins, 60)
        } else if let Some(hours) = s.strip_suffix('h') {
            parse_secs(hours, 60 * 60)
        } else {
            parse_secs(s, 1)
        }
    }

    fn parse_secs(value: &str, unit_secs: u64) -> Result<Duration, &'static str> {
        value
            .trim()
            .parse::<u64>()
            .map_err(|_| "invalid duration format")?
            .checked_mul(unit_secs)
            .map(Duration::from_secs)
            .ok_or("duration overflow")
    }

    fn parse_scaled(value: &str, unit_nanos: u128) -> Result<Duration, &'static str> {
        let nanos = value
            .trim()
            .parse::<u128>()
            .map_err(|_| "invalid duration format")?
            .checked_mul(unit_nanos)
            .ok_or("duration overflow")?;
        let secs = u64::try_from(nanos / NANOS_PER_SEC).map_err(|_| "duration overflow")?;
        Ok(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
    }
}
