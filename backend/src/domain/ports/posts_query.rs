//! Driving port for reading posts.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostId};

/// Read-only use-cases.
///
/// The store imposes no order; presentation layers sort.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// Every stored post.
    async fn list_posts(&self) -> Result<Vec<Post>, Error>;

    /// A single post; `not_found` when `id` is absent.
    async fn get_post(&self, id: &PostId) -> Result<Post, Error>;
}
