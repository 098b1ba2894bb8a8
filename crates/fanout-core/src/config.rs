//! Fetch configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a
//! valid configuration:
//!
//! ```toml
//! comment_failure_rate = 0.1
//! seed = 42
//!
//! [latency]
//! profile_ms = 1000
//! posts_ms = 1500
//! comments_ms = 2000
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Simulated latency per fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Latency {
    /// Profile fetch delay in milliseconds
    pub profile_ms: u64,
    /// Posts fetch delay in milliseconds
    pub posts_ms: u64,
    /// Comments fetch delay in milliseconds
    pub comments_ms: u64,
}

impl Latency {
    /// No delay at all
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self {
            profile_ms: 0,
            posts_ms: 0,
            comments_ms: 0,
        }
    }

    /// Profile delay
    #[inline]
    #[must_use]
    pub fn profile(&self) -> Duration {
        Duration::from_millis(self.profile_ms)
    }

    /// Posts delay
    #[inline]
    #[must_use]
    pub fn posts(&self) -> Duration {
        Duration::from_millis(self.posts_ms)
    }

    /// Comments delay
    #[inline]
    #[must_use]
    pub fn comments(&self) -> Duration {
        Duration::from_millis(self.comments_ms)
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            profile_ms: 1000,
            posts_ms: 1500,
            comments_ms: 2000,
        }
    }
}

/// Fanout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Simulated fetch latency
    pub latency: Latency,
    /// Probability that a single comment fetch fails
    pub comment_failure_rate: f64,
    /// Seed for reproducible failure injection
    pub seed: Option<u64>,
}

impl FetchConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With latency
    #[inline]
    #[must_use]
    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// With comment failure rate
    #[inline]
    #[must_use]
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.comment_failure_rate = rate;
        self
    }

    /// With failure injection seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.comment_failure_rate;
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::Invalid(format!(
                "comment_failure_rate must be within [0, 1], got {rate}"
            )));
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            latency: Latency::default(),
            comment_failure_rate: 0.1,
            seed: None,
        }
    }
}
