//! Error types for Fanout Core
//!
//! Provides error handling for:
//! - Individual fetch failures (profile, posts, comments)
//! - Fail-fast aggregation propagating an upstream failure
//! - Configuration loading and validation

use crate::types::{PostId, UserId};

/// Failure of a single fetch
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Profile fetch failed
    #[error("failed to fetch profile for user {0}")]
    Profile(UserId),

    /// Post listing failed
    #[error("failed to fetch posts for user {0}")]
    Posts(UserId),

    /// Comment listing failed (injected transient failure)
    #[error("failed to fetch comments for post {0}")]
    Comments(PostId),
}

impl FetchError {
    /// Check if a repeated attempt could succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Comments(_))
    }
}

/// Fail-fast aggregation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// Profile or posts fetch failed
    #[error("failed to fetch user content: {0}")]
    Upstream(#[from] FetchError),
}

impl AggregateError {
    /// The fetch failure that aborted the aggregation
    #[inline]
    #[must_use]
    pub fn fetch_error(&self) -> &FetchError {
        match self {
            Self::Upstream(e) => e,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}
