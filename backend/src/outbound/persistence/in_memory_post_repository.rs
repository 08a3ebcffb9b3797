//! Process-local post repository.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::Post;
use crate::domain::ports::{PostRepository, PostRepositoryError};

/// Keeps the collection in memory; nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<Post>>,
}

impl InMemoryPostRepository {
    /// Start with `posts` already stored.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<Post>>, String> {
        self.posts
            .lock()
            .map_err(|_| "in-memory post store lock poisoned".to_owned())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn load(&self) -> Result<Vec<Post>, PostRepositoryError> {
        self.guard()
            .map(|posts| posts.clone())
            .map_err(PostRepositoryError::read)
    }

    async fn persist(&self, posts: &[Post]) -> Result<(), PostRepositoryError> {
        let mut stored = self.guard().map_err(PostRepositoryError::write)?;
        *stored = posts.to_vec();
        Ok(())
    }
}
