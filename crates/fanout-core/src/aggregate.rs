//! Content aggregation strategies
//!
//! Three ways of combining a profile, its posts and per-post comments:
//! - `sequential`: every fetch in order, comment failures contained per post
//! - `parallel`: profile and posts together, then all comments together,
//!   comment failures contained per post
//! - `user_content`: fail-fast; upstream failures are returned as errors
//!
//! Contained comment failures never set the top-level error. Only a
//! profile or posts failure makes a result partial.

use crate::error::{AggregateError, FetchError};
use crate::source::ContentSource;
use crate::types::{AggregationResult, Comment, Post, User, UserContent, UserId};
use futures::future::join_all;
use std::time::Duration;
use tokio::time::Instant;

/// Concurrency strategy for the partial-tolerant aggregators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// One fetch at a time
    #[default]
    Sequential,
    /// Independent fetches overlap
    Parallel,
}

impl Strategy {
    /// Both strategies, in comparison order
    pub const ALL: [Strategy; 2] = [Strategy::Sequential, Strategy::Parallel];

    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Parallel => "parallel",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Strategy::Sequential),
            "parallel" => Ok(Strategy::Parallel),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

/// Orchestrates a `ContentSource` into combined user content
#[derive(Debug, Clone)]
pub struct Aggregator<S> {
    source: S,
}

impl<S: ContentSource> Aggregator<S> {
    /// Create an aggregator over `source`
    #[inline]
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Underlying source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the chosen partial-tolerant strategy
    pub async fn run(&self, strategy: Strategy, user_id: UserId) -> AggregationResult {
        match strategy {
            Strategy::Sequential => self.sequential(user_id).await,
            Strategy::Parallel => self.parallel(user_id).await,
        }
    }

    /// Run the chosen strategy and report how long it took
    pub async fn run_timed(
        &self,
        strategy: Strategy,
        user_id: UserId,
    ) -> (AggregationResult, Duration) {
        let start = Instant::now();
        let result = self.run(strategy, user_id).await;
        (result, start.elapsed())
    }

    /// Fetch profile, posts and each post's comments strictly in order
    ///
    /// Comment fetches run one after another; a failed one leaves an empty
    /// list on its post and the remaining posts proceed. A profile or posts
    /// failure yields a partial result holding whatever was fetched before
    /// the failure.
    pub async fn sequential(&self, user_id: UserId) -> AggregationResult {
        tracing::info!(%user_id, "starting sequential fetch");
        let start = Instant::now();

        let mut user = None;
        let mut posts = Vec::new();

        match self.sequential_stages(user_id, &mut user, &mut posts).await {
            Ok(()) => {
                tracing::info!(elapsed_ms = elapsed_ms(start), "sequential fetch finished");
                AggregationResult {
                    user,
                    posts,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "sequential fetch incomplete");
                AggregationResult::partial(user, posts)
            }
        }
    }

    async fn sequential_stages(
        &self,
        user_id: UserId,
        user: &mut Option<User>,
        posts: &mut Vec<Post>,
    ) -> Result<(), FetchError> {
        let profile = self.source.fetch_user_profile(user_id).await?;
        tracing::info!(user = %profile.username, "user profile retrieved");
        *user = Some(profile);

        *posts = self.source.fetch_user_posts(user_id).await?;
        tracing::info!(count = posts.len(), "posts retrieved");

        for post in posts.iter_mut() {
            let outcome = self.source.fetch_post_comments(post.post_id).await;
            settle_comments(post, outcome);
        }
        Ok(())
    }

    /// Fetch profile and posts concurrently, then all comments concurrently
    ///
    /// Comment lists are reassembled by post position, independent of the
    /// order in which the fetches complete. A profile or posts failure
    /// discards the pair and yields a partial result with no user.
    pub async fn parallel(&self, user_id: UserId) -> AggregationResult {
        tracing::info!(%user_id, "starting parallel fetch");
        let start = Instant::now();

        let (user, mut posts) = match tokio::try_join!(
            self.source.fetch_user_profile(user_id),
            self.source.fetch_user_posts(user_id),
        ) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(error = %e, "parallel fetch incomplete");
                return AggregationResult::partial(None, Vec::new());
            }
        };
        tracing::info!(count = posts.len(), "user and posts retrieved together");

        self.attach_all_comments(&mut posts).await;

        tracing::info!(elapsed_ms = elapsed_ms(start), "parallel fetch finished");
        AggregationResult::complete(user, posts)
    }

    /// Fetch profile then posts, then all comments concurrently
    ///
    /// Comment failures are contained per post as in `parallel`. A profile
    /// or posts failure is returned to the caller; there is no fallback
    /// value.
    pub async fn user_content(&self, user_id: UserId) -> Result<UserContent, AggregateError> {
        tracing::info!(%user_id, "fetching all user content");

        let result = self.user_content_stages(user_id).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "failed to fetch user content");
        }
        result
    }

    async fn user_content_stages(&self, user_id: UserId) -> Result<UserContent, AggregateError> {
        let user = self.source.fetch_user_profile(user_id).await?;
        tracing::info!(step = 1, name = %user.name, "user profile retrieved");

        let mut posts = self.source.fetch_user_posts(user_id).await?;
        tracing::info!(step = 2, count = posts.len(), "posts retrieved");

        self.attach_all_comments(&mut posts).await;
        tracing::info!(step = 3, "comments retrieved");

        Ok(UserContent { user, posts })
    }

    /// One comment fetch per post, all in flight at once, joined positionally
    async fn attach_all_comments(&self, posts: &mut [Post]) {
        let outcomes = join_all(
            posts
                .iter()
                .map(|post| self.source.fetch_post_comments(post.post_id)),
        )
        .await;

        for (post, outcome) in posts.iter_mut().zip(outcomes) {
            settle_comments(post, outcome);
        }
    }
}

/// Attach fetched comments, or an empty list when the fetch failed
fn settle_comments(post: &mut Post, outcome: Result<Vec<Comment>, FetchError>) {
    match outcome {
        Ok(comments) => {
            tracing::debug!(post_id = %post.post_id, count = comments.len(), "comments attached");
            post.attach_comments(comments);
        }
        Err(e) => {
            tracing::warn!(post_id = %post.post_id, error = %e, "error fetching comments");
            post.recover_comments(e.to_string());
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{sample_comments, sample_posts, sample_user, MockContentSource};
    use crate::types::PostId;
    use pretty_assertions::assert_eq;

    /// Comments for lower post ids arrive last
    #[derive(Debug)]
    struct ReverseLatencySource;

    #[async_trait::async_trait]
    impl ContentSource for ReverseLatencySource {
        async fn fetch_user_profile(&self, user_id: UserId) -> Result<User, FetchError> {
            Ok(sample_user(user_id))
        }

        async fn fetch_user_posts(&self, user_id: UserId) -> Result<Vec<Post>, FetchError> {
            Ok(sample_posts(user_id))
        }

        async fn fetch_post_comments(&self, post_id: PostId) -> Result<Vec<Comment>, FetchError> {
            tokio::time::sleep(Duration::from_millis(100 * (10 - post_id.0))).await;
            if post_id.0 == 2 {
                return Err(FetchError::Comments(post_id));
            }
            Ok(sample_comments(post_id))
        }
    }

    fn mock_with_posts_failure() -> MockContentSource {
        let mut mock = MockContentSource::new();
        mock.expect_fetch_user_profile()
            .returning(|id| Ok(sample_user(id)));
        mock.expect_fetch_user_posts()
            .returning(|id| Err(FetchError::Posts(id)));
        mock.expect_fetch_post_comments().never();
        mock
    }

    #[test]
    fn strategy_parses_and_displays() {
        assert_eq!("Parallel".parse::<Strategy>(), Ok(Strategy::Parallel));
        assert_eq!("sequential".parse::<Strategy>(), Ok(Strategy::Sequential));
        assert!("both".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Parallel.to_string(), "parallel");
    }

    #[tokio::test(start_paused = true)]
    async fn parallel_reassembles_by_position() {
        let aggregator = Aggregator::new(ReverseLatencySource);
        let result = aggregator.parallel(UserId(1)).await;

        let ids: Vec<u64> = result.posts.iter().map(|p| p.post_id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for post in &result.posts {
            assert!(post.comments().iter().all(|c| c.post_id == post.post_id));
        }
        assert!(result.posts[1].comments_recovered());
        assert_eq!(result.posts[0].comments().len(), 3);
        assert_eq!(result.posts[2].comments().len(), 3);
        assert!(!result.is_partial());
    }

    #[tokio::test]
    async fn sequential_keeps_profile_when_posts_fail() {
        let aggregator = Aggregator::new(mock_with_posts_failure());
        let result = aggregator.sequential(UserId(4)).await;

        assert_eq!(result.user, Some(sample_user(UserId(4))));
        assert!(result.posts.is_empty());
        assert!(result.is_partial());
    }

    #[tokio::test]
    async fn parallel_drops_profile_when_posts_fail() {
        let aggregator = Aggregator::new(mock_with_posts_failure());
        let result = aggregator.parallel(UserId(4)).await;

        assert_eq!(result, AggregationResult::partial(None, Vec::new()));
    }

    #[tokio::test]
    async fn user_content_propagates_posts_failure() {
        let aggregator = Aggregator::new(mock_with_posts_failure());
        let err = aggregator.user_content(UserId(4)).await.unwrap_err();

        assert_eq!(err, AggregateError::Upstream(FetchError::Posts(UserId(4))));
    }

    #[tokio::test]
    async fn sequential_stops_after_profile_failure() {
        let mut mock = MockContentSource::new();
        mock.expect_fetch_user_profile()
            .returning(|id| Err(FetchError::Profile(id)));
        mock.expect_fetch_user_posts().never();
        mock.expect_fetch_post_comments().never();

        let result = Aggregator::new(mock).sequential(UserId(1)).await;
        assert_eq!(result, AggregationResult::partial(None, Vec::new()));
    }

    #[tokio::test]
    async fn comment_fetch_requested_once_per_post() {
        let mut mock = MockContentSource::new();
        mock.expect_fetch_user_profile()
            .times(1)
            .returning(|id| Ok(sample_user(id)));
        mock.expect_fetch_user_posts()
            .times(1)
            .returning(|id| Ok(sample_posts(id)));
        mock.expect_fetch_post_comments()
            .times(3)
            .returning(|id| Ok(sample_comments(id)));

        let content = Aggregator::new(mock).user_content(UserId(1)).await.unwrap();
        assert_eq!(content.posts.len(), 3);
        assert!(content.posts.iter().all(|p| p.comments().len() == 3));
    }
}
