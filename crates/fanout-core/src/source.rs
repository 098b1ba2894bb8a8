//! Content fetchers
//!
//! `ContentSource` is the seam between the aggregators and whatever
//! produces users, posts and comments. `SimulatedSource` stands in for a
//! remote service: every fetch suspends for a configured latency, and
//! comment fetches fail at random.

use crate::clock::{Clock, TokioClock};
use crate::config::{FetchConfig, Latency};
use crate::error::FetchError;
use crate::failure::{FailureInjector, FailurePolicy};
use crate::types::{Comment, CommentId, Post, PostId, User, UserId};
use std::sync::Arc;

/// Producer of the three entity kinds
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the profile for `user_id`
    async fn fetch_user_profile(&self, user_id: UserId) -> Result<User, FetchError>;

    /// Fetch the posts written by `user_id`, without comments
    async fn fetch_user_posts(&self, user_id: UserId) -> Result<Vec<Post>, FetchError>;

    /// Fetch the comments on `post_id`
    async fn fetch_post_comments(&self, post_id: PostId) -> Result<Vec<Comment>, FetchError>;
}

#[async_trait::async_trait]
impl<S: ContentSource + ?Sized> ContentSource for Arc<S> {
    async fn fetch_user_profile(&self, user_id: UserId) -> Result<User, FetchError> {
        (**self).fetch_user_profile(user_id).await
    }

    async fn fetch_user_posts(&self, user_id: UserId) -> Result<Vec<Post>, FetchError> {
        (**self).fetch_user_posts(user_id).await
    }

    async fn fetch_post_comments(&self, post_id: PostId) -> Result<Vec<Comment>, FetchError> {
        (**self).fetch_post_comments(post_id).await
    }
}

/// In-process stand-in for the remote content service
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    latency: Latency,
    clock: Arc<dyn Clock>,
    failures: Arc<dyn FailurePolicy>,
}

impl SimulatedSource {
    /// Create with explicit collaborators
    pub fn new(latency: Latency, clock: Arc<dyn Clock>, failures: Arc<dyn FailurePolicy>) -> Self {
        Self {
            latency,
            clock,
            failures,
        }
    }

    /// Create from configuration, using the tokio timer
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.latency,
            Arc::new(TokioClock),
            Arc::new(FailureInjector::from_config(config)),
        )
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the failure policy
    #[must_use]
    pub fn with_failures(mut self, failures: Arc<dyn FailurePolicy>) -> Self {
        self.failures = failures;
        self
    }

    /// Configured latency
    #[inline]
    #[must_use]
    pub fn latency(&self) -> Latency {
        self.latency
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

#[async_trait::async_trait]
impl ContentSource for SimulatedSource {
    async fn fetch_user_profile(&self, user_id: UserId) -> Result<User, FetchError> {
        self.clock.sleep(self.latency.profile()).await;
        tracing::debug!(%user_id, "profile fetched");
        Ok(sample_user(user_id))
    }

    async fn fetch_user_posts(&self, user_id: UserId) -> Result<Vec<Post>, FetchError> {
        self.clock.sleep(self.latency.posts()).await;
        let posts = sample_posts(user_id);
        tracing::debug!(%user_id, count = posts.len(), "posts fetched");
        Ok(posts)
    }

    async fn fetch_post_comments(&self, post_id: PostId) -> Result<Vec<Comment>, FetchError> {
        self.clock.sleep(self.latency.comments()).await;
        if self.failures.should_fail() {
            tracing::debug!(%post_id, "comment fetch failure injected");
            return Err(FetchError::Comments(post_id));
        }
        let comments = sample_comments(post_id);
        tracing::debug!(%post_id, count = comments.len(), "comments fetched");
        Ok(comments)
    }
}

/// Fixed profile served for every user
#[must_use]
pub fn sample_user(user_id: UserId) -> User {
    User {
        id: user_id,
        name: "Kristine Garcia".to_string(),
        email: "kristinemayg@gmail.com".to_string(),
        username: "kristinemayg".to_string(),
    }
}

/// Fixed three-post listing stamped with `user_id`
#[must_use]
pub fn sample_posts(user_id: UserId) -> Vec<Post> {
    const POSTS: [(u64, &str, &str); 3] = [
        (1, "My First Post", "This is the content of my first post."),
        (
            2,
            "Another Day, Another Post",
            "Here's some more content for my second post.",
        ),
        (3, "Yet Another Post", "Content for the third post goes here."),
    ];

    POSTS
        .iter()
        .map(|&(id, title, content)| Post::new(PostId(id), user_id, title, content))
        .collect()
}

/// Fixed three-comment listing for `post_id`
#[must_use]
pub fn sample_comments(post_id: PostId) -> Vec<Comment> {
    const COMMENTS: [(u64, &str, &str); 3] = [
        (101, "commenter1", "Great post!"),
        (102, "commenter2", "Thanks for sharing."),
        (103, "commenter3", "Very informative."),
    ];

    COMMENTS
        .iter()
        .map(|&(id, username, content)| Comment {
            comment_id: CommentId(id),
            post_id,
            username: username.to_string(),
            content: content.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ImmediateClock;
    use crate::failure::{Always, Never};
    use proptest::prelude::*;
    use std::time::Duration;
    use tokio::time::Instant;

    fn unthrottled(failures: Arc<dyn FailurePolicy>) -> SimulatedSource {
        SimulatedSource::default()
            .with_clock(Arc::new(ImmediateClock))
            .with_failures(failures)
    }

    #[tokio::test]
    async fn profile_has_requested_id() {
        let source = unthrottled(Arc::new(Never));
        let user = source.fetch_user_profile(UserId(42)).await.unwrap();
        assert_eq!(user.id, UserId(42));
        assert_eq!(user.name, "Kristine Garcia");
        assert_eq!(user.username, "kristinemayg");
    }

    #[tokio::test]
    async fn posts_are_ordered_and_uncommented() {
        let source = unthrottled(Arc::new(Never));
        let posts = source.fetch_user_posts(UserId(5)).await.unwrap();
        let ids: Vec<u64> = posts.iter().map(|p| p.post_id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(posts.iter().all(|p| p.user_id == UserId(5)));
        assert!(posts.iter().all(|p| p.comments.is_none()));
    }

    #[tokio::test]
    async fn comments_belong_to_post() {
        let source = unthrottled(Arc::new(Never));
        let comments = source.fetch_post_comments(PostId(2)).await.unwrap();
        assert_eq!(comments.len(), 3);
        assert!(comments.iter().all(|c| c.post_id == PostId(2)));
        assert_eq!(comments[0].comment_id, CommentId(101));
        assert_eq!(comments[2].content, "Very informative.");
    }

    #[tokio::test]
    async fn injected_failure_names_post() {
        let source = unthrottled(Arc::new(Always));
        let err = source.fetch_post_comments(PostId(3)).await.unwrap_err();
        assert_eq!(err, FetchError::Comments(PostId(3)));
    }

    #[tokio::test]
    async fn profile_and_posts_ignore_failure_policy() {
        let source = unthrottled(Arc::new(Always));
        assert!(source.fetch_user_profile(UserId(1)).await.is_ok());
        assert!(source.fetch_user_posts(UserId(1)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_wait_for_configured_latency() {
        let source = SimulatedSource::new(
            Latency::default(),
            Arc::new(TokioClock),
            Arc::new(Never),
        );

        let start = Instant::now();
        source.fetch_user_profile(UserId(1)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));

        let start = Instant::now();
        source.fetch_user_posts(UserId(1)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));

        let start = Instant::now();
        source.fetch_post_comments(PostId(1)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_latency_config_does_not_suspend() {
        let config = FetchConfig::new().with_latency(Latency::zero()).with_seed(1);
        let source = SimulatedSource::from_config(&config);
        assert_eq!(source.latency(), Latency::zero());

        let start = Instant::now();
        source.fetch_user_profile(UserId(1)).await.unwrap();
        source.fetch_user_posts(UserId(1)).await.unwrap();
        let _ = source.fetch_post_comments(PostId(1)).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn default_source_uses_default_latency() {
        assert_eq!(SimulatedSource::default().latency(), Latency::default());
    }

    #[tokio::test]
    async fn comment_failure_rate_is_close_to_configured() {
        let source = unthrottled(Arc::new(FailureInjector::seeded(0.1, 2024)));

        let mut failures = 0_u32;
        for _ in 0..10_000 {
            if source.fetch_post_comments(PostId(1)).await.is_err() {
                failures += 1;
            }
        }

        let rate = f64::from(failures) / 10_000.0;
        assert!((0.08..=0.12).contains(&rate), "observed failure rate {rate}");
    }

    proptest! {
        #[test]
        fn sample_posts_stamp_any_user(id in any::<u64>()) {
            let posts = sample_posts(UserId(id));
            prop_assert_eq!(posts.len(), 3);
            prop_assert!(posts.iter().all(|p| p.user_id == UserId(id) && p.comments.is_none()));
        }

        #[test]
        fn sample_user_keeps_any_id(id in any::<u64>()) {
            prop_assert_eq!(sample_user(UserId(id)).id, UserId(id));
        }
    }
}
