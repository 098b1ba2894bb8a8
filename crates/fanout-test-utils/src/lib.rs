//! Testing utilities for Fanout workspace
//!
//! Shared stub sources and fixtures.

#![allow(missing_docs)]

use fanout_core::{
    sample_comments, sample_posts, sample_user, Comment, ContentSource, FailurePolicy, FetchError,
    ImmediateClock, Post, PostId, SimulatedSource, User, UserId,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Whether a stubbed fetch succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeed,
    Fail,
}

/// A fetch observed by a `StubSource`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Profile(UserId),
    Posts(UserId),
    Comments(PostId),
}

/// Deterministic, delay-free source with per-fetcher outcomes
#[derive(Debug)]
pub struct StubSource {
    profile: Outcome,
    posts: Outcome,
    comments: Outcome,
    failing_posts: Vec<PostId>,
    calls: Mutex<Vec<Call>>,
}

impl StubSource {
    pub fn new(profile: Outcome, posts: Outcome, comments: Outcome) -> Self {
        Self {
            profile,
            posts,
            comments,
            failing_posts: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Outcome::Succeed, Outcome::Succeed, Outcome::Succeed)
    }

    pub fn failing_comments() -> Self {
        Self::new(Outcome::Succeed, Outcome::Succeed, Outcome::Fail)
    }

    /// Comment fetches fail only for the listed posts
    pub fn failing_comments_for(posts: impl IntoIterator<Item = PostId>) -> Self {
        Self {
            failing_posts: posts.into_iter().collect(),
            ..Self::succeeding()
        }
    }

    pub fn rejecting_posts() -> Self {
        Self::new(Outcome::Succeed, Outcome::Fail, Outcome::Succeed)
    }

    pub fn rejecting_profile() -> Self {
        Self::new(Outcome::Fail, Outcome::Succeed, Outcome::Succeed)
    }

    /// Fetches made so far, in call order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait::async_trait]
impl ContentSource for StubSource {
    async fn fetch_user_profile(&self, user_id: UserId) -> Result<User, FetchError> {
        self.record(Call::Profile(user_id));
        match self.profile {
            Outcome::Succeed => Ok(sample_user(user_id)),
            Outcome::Fail => Err(FetchError::Profile(user_id)),
        }
    }

    async fn fetch_user_posts(&self, user_id: UserId) -> Result<Vec<Post>, FetchError> {
        self.record(Call::Posts(user_id));
        match self.posts {
            Outcome::Succeed => Ok(sample_posts(user_id)),
            Outcome::Fail => Err(FetchError::Posts(user_id)),
        }
    }

    async fn fetch_post_comments(&self, post_id: PostId) -> Result<Vec<Comment>, FetchError> {
        self.record(Call::Comments(post_id));
        if self.comments == Outcome::Fail || self.failing_posts.contains(&post_id) {
            return Err(FetchError::Comments(post_id));
        }
        Ok(sample_comments(post_id))
    }
}

/// Simulated source with default latency that never suspends
pub fn instant_source(failures: Arc<dyn FailurePolicy>) -> SimulatedSource {
    SimulatedSource::default()
        .with_clock(Arc::new(ImmediateClock))
        .with_failures(failures)
}

/// The profile every simulated user resolves to
pub fn expected_user(user_id: u64) -> User {
    sample_user(UserId(user_id))
}

/// The fully commented posts every simulated user resolves to
pub fn expected_posts(user_id: u64) -> Vec<Post> {
    sample_posts(UserId(user_id))
        .into_iter()
        .map(|mut post| {
            post.attach_comments(sample_comments(post.post_id));
            post
        })
        .collect()
}
