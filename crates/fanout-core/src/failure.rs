//! Failure injection for simulated fetches
//!
//! A `FailurePolicy` decides, per invocation, whether a fetch fails. The
//! randomized policy draws from a seedable generator so both branches can
//! be reproduced in tests.

use crate::config::FetchConfig;
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Decides whether a single fetch fails
pub trait FailurePolicy: Send + Sync + std::fmt::Debug {
    /// Draw one outcome; `true` means the fetch fails
    fn should_fail(&self) -> bool;
}

/// Randomized failure with a fixed probability
///
/// Each draw is independent: there is no memory of earlier outcomes and
/// no retry state.
#[derive(Debug)]
pub struct FailureInjector {
    probability: f64,
    rng: Mutex<StdRng>,
}

impl FailureInjector {
    /// Reproducible injector
    #[must_use]
    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Injector seeded from system randomness
    #[must_use]
    pub fn from_entropy(probability: f64) -> Self {
        Self::seeded(probability, rand::random())
    }

    /// Build from configuration (seeded when the config names a seed)
    #[must_use]
    pub fn from_config(config: &FetchConfig) -> Self {
        match config.seed {
            Some(seed) => Self::seeded(config.comment_failure_rate, seed),
            None => Self::from_entropy(config.comment_failure_rate),
        }
    }

    /// Configured failure probability
    #[inline]
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl FailurePolicy for FailureInjector {
    fn should_fail(&self) -> bool {
        let draw: f64 = self.rng.lock().random();
        draw < self.probability
    }
}

/// Never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl FailurePolicy for Never {
    fn should_fail(&self) -> bool {
        false
    }
}

/// Always fails
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl FailurePolicy for Always {
    fn should_fail(&self) -> bool {
        true
    }
}
