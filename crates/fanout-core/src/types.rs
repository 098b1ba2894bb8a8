//! Core types for Fanout
//!
//! Defines the records produced by the fetchers and assembled by the
//! aggregators:
//! - Identifiers for users, posts and comments
//! - `User`, `Post` and `Comment` records
//! - `AggregationResult` (partial-tolerant) and `UserContent` (fail-fast)

use serde::{Deserialize, Serialize};

/// Message carried by a partial result.
pub const INCOMPLETE_FETCH_MESSAGE: &str = "Data fetch incomplete due to errors.";

/// Message shown when a result carries neither a user nor an error.
pub const NO_DATA_MESSAGE: &str = "No data available";

/// Unique user identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Unique post identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique comment identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User profile record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Handle
    pub username: String,
}

/// A post authored by a user
///
/// `comments` stays `None` until an aggregator attaches a list. When the
/// attached list is empty because the comment fetch failed and was
/// recovered, `comments_error` carries the failure message, so "no
/// comments" and "comments unavailable" remain distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post identifier
    pub post_id: PostId,
    /// Owning user
    pub user_id: UserId,
    /// Title line
    pub title: String,
    /// Body text
    pub content: String,
    /// Attached comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    /// Why the attached comment list is empty, if it was recovered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_error: Option<String>,
}

impl Post {
    /// Create a post without comments
    #[inline]
    #[must_use]
    pub fn new(
        post_id: PostId,
        user_id: UserId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            post_id,
            user_id,
            title: title.into(),
            content: content.into(),
            comments: None,
            comments_error: None,
        }
    }

    /// Attach a successfully fetched comment list
    #[inline]
    pub fn attach_comments(&mut self, comments: Vec<Comment>) {
        self.comments = Some(comments);
        self.comments_error = None;
    }

    /// Attach an empty list in place of a failed fetch
    #[inline]
    pub fn recover_comments(&mut self, reason: impl Into<String>) {
        self.comments = Some(Vec::new());
        self.comments_error = Some(reason.into());
    }

    /// Comments attached so far (empty when not populated)
    #[inline]
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        self.comments.as_deref().unwrap_or_default()
    }

    /// Whether the comment list was substituted after a failure
    #[inline]
    #[must_use]
    pub fn comments_recovered(&self) -> bool {
        self.comments_error.is_some()
    }
}

/// A comment on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment identifier
    pub comment_id: CommentId,
    /// Post this comment belongs to
    pub post_id: PostId,
    /// Commenter handle
    pub username: String,
    /// Comment text
    pub content: String,
}

/// Combined user content tolerant of partial failure
///
/// When `error` is set the result is partial: `user` may be absent and
/// posts may lack comments. When `error` is absent every post carries a
/// comment list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregationResult {
    /// The requested user, if fetched
    pub user: Option<User>,
    /// Posts, each with comments attached on success
    pub posts: Vec<Post>,
    /// Top-level error descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AggregationResult {
    /// Complete result
    #[inline]
    #[must_use]
    pub fn complete(user: User, posts: Vec<Post>) -> Self {
        Self {
            user: Some(user),
            posts,
            error: None,
        }
    }

    /// Partial result carrying the incomplete-fetch descriptor
    #[inline]
    #[must_use]
    pub fn partial(user: Option<User>, posts: Vec<Post>) -> Self {
        Self {
            user,
            posts,
            error: Some(INCOMPLETE_FETCH_MESSAGE.to_string()),
        }
    }

    /// Whether the error descriptor is set
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }

    /// Number of posts whose comments were recovered after a failure
    #[must_use]
    pub fn recovered_posts(&self) -> usize {
        self.posts.iter().filter(|p| p.comments_recovered()).count()
    }
}

/// Combined user content from the fail-fast aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContent {
    /// The requested user
    pub user: User,
    /// Posts with comments attached
    pub posts: Vec<Post>,
}

impl From<UserContent> for AggregationResult {
    fn from(content: UserContent) -> Self {
        Self::complete(content.user, content.posts)
    }
}
