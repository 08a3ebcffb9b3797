//! Driving port for post mutations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Comment, Error, NewComment, NewPost, Post, PostChanges, PostId, ReactionDirection,
    ReactionKind,
};

/// Counter value after a reaction was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionCount {
    /// Post the counter belongs to.
    pub id: PostId,
    /// Which counter moved.
    pub kind: ReactionKind,
    /// Authoritative value after the change.
    pub count: u64,
}

/// Mutating use-cases. Every call is one serialised unit of work against the
/// stored collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsCommand: Send + Sync {
    /// Create a post with a fresh id, zero counters and no comments.
    async fn create_post(&self, draft: NewPost) -> Result<Post, Error>;

    /// Apply a partial update; `not_found` when `id` is absent.
    async fn update_post(&self, id: &PostId, changes: PostChanges) -> Result<Post, Error>;

    /// Remove a post permanently; `not_found` when `id` is absent.
    async fn delete_post(&self, id: &PostId) -> Result<(), Error>;

    /// Move a like/dislike counter by one step, clamped at zero.
    async fn react(
        &self,
        id: &PostId,
        kind: ReactionKind,
        direction: ReactionDirection,
    ) -> Result<ReactionCount, Error>;

    /// Append a comment; `not_found` when `id` is absent.
    async fn add_comment(&self, id: &PostId, comment: NewComment) -> Result<Comment, Error>;
}
