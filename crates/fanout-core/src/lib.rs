//! Fanout Core - user content aggregation
//!
//! Combines a user profile, the user's posts and each post's comments
//! into one result, under different concurrency strategies:
//! - Sequential: every fetch waits for the previous one
//! - Parallel: independent fetches overlap, results reassembled in order
//! - Fail-fast: upstream failures surface as errors instead of partial data
//!
//! Fetches go through a [`ContentSource`]. The bundled [`SimulatedSource`]
//! stands in for a remote service with configurable latency (driven by an
//! injectable [`Clock`]) and randomized comment failures (driven by an
//! injectable [`FailurePolicy`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use fanout_core::{Aggregator, FetchConfig, SimulatedSource, Strategy, UserId};
//!
//! # async fn example() {
//! let source = SimulatedSource::from_config(&FetchConfig::new().with_seed(42));
//! let aggregator = Aggregator::new(source);
//!
//! let result = aggregator.run(Strategy::Parallel, UserId(1)).await;
//! println!("{} posts, partial: {}", result.posts.len(), result.is_partial());
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod aggregate;
pub mod clock;
pub mod config;
pub mod error;
pub mod failure;
pub mod source;
pub mod types;

// Re-exports for convenience
pub use aggregate::{Aggregator, Strategy};
pub use clock::{Clock, ImmediateClock, TokioClock};
pub use config::{FetchConfig, Latency};
pub use error::{AggregateError, ConfigError, FetchError};
pub use failure::{Always, FailureInjector, FailurePolicy, Never};
pub use source::{sample_comments, sample_posts, sample_user, ContentSource, SimulatedSource};
pub use types::{
    AggregationResult, Comment, CommentId, Post, PostId, User, UserContent, UserId,
    INCOMPLETE_FETCH_MESSAGE, NO_DATA_MESSAGE,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Fanout Core
    pub use crate::{
        AggregationResult, Aggregator, ContentSource, FetchConfig, FetchError, SimulatedSource,
        Strategy, UserContent, UserId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
