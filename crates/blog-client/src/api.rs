//! Port through which the client reaches the blog server.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::model::{PostView, ReactionDirection, ReactionKind};

/// Remote operations the sync protocol depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Fetch every post.
    async fn list_posts(&self) -> Result<Vec<PostView>, ClientError>;

    /// Move one counter by one step and return the server's count afterwards.
    async fn react(
        &self,
        post_id: &str,
        kind: ReactionKind,
        direction: ReactionDirection,
    ) -> Result<u64, ClientError>;
}
