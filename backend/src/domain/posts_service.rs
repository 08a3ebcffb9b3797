//! Post use-cases implementing the [`PostsCommand`] and [`PostsQuery`] ports.
//!
//! Each mutation is one unit of work on the [`WriteQueue`]: load the whole
//! collection, change it in memory, persist it. Because the repository
//! persists atomically and the queue runs one unit at a time, a failed unit
//! leaves the stored collection exactly as it was and concurrent units never
//! lose each other's updates. A unit whose load fails never persists; reads
//! treat the same failure as an empty collection.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    PostRepository, PostRepositoryError, PostsCommand, PostsQuery, ReactionCount,
};
use crate::domain::{
    Comment, Error, Millis, NewComment, NewPost, Post, PostChanges, PostId, ReactionDirection,
    ReactionKind, WriteQueue, WriteQueueError,
};

/// How reads relate to queued writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadConsistency {
    /// Reads go straight to the repository and may run ahead of writes that
    /// are queued but not yet applied.
    #[default]
    Relaxed,
    /// Reads wait their turn on the write queue, so a read observes every
    /// write enqueued before it.
    Serialized,
}

/// Post service owning the write queue for one repository.
pub struct PostsService<R> {
    repo: Arc<R>,
    queue: WriteQueue,
    clock: Arc<dyn Clock>,
    reads: ReadConsistency,
}

impl<R> Clone for PostsService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            queue: self.queue.clone(),
            clock: Arc::clone(&self.clock),
            reads: self.reads,
        }
    }
}

impl<R> PostsService<R>
where
    R: PostRepository + 'static,
{
    /// Create a service and spawn its write queue on the current runtime.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            queue: WriteQueue::spawn(),
            clock,
            reads: ReadConsistency::default(),
        }
    }

    /// Choose how reads interact with queued writes.
    #[must_use]
    pub fn with_read_consistency(mut self, reads: ReadConsistency) -> Self {
        self.reads = reads;
        self
    }

    fn now(&self) -> Millis {
        self.clock.utc().timestamp_millis()
    }

    fn map_repository_error(error: PostRepositoryError) -> Error {
        match error {
            PostRepositoryError::Read { message } => {
                Error::internal(format!("posts store read failed: {message}"))
            }
            PostRepositoryError::Write { message } => {
                Error::internal(format!("posts store write failed: {message}"))
            }
        }
    }

    fn map_queue_error(error: WriteQueueError) -> Error {
        error!(%error, "write queue failure");
        Error::internal(error.to_string())
    }

    fn post_not_found(id: &PostId) -> Error {
        Error::not_found(format!("post {id} not found")).with_details(json!({ "id": id }))
    }

    fn position(posts: &[Post], id: &PostId) -> Result<usize, Error> {
        posts
            .iter()
            .position(|post| post.id() == id)
            .ok_or_else(|| Self::post_not_found(id))
    }

    /// Load for a read, serving an empty collection when the store is
    /// unreadable.
    async fn load_failing_open(repo: &R) -> Result<Vec<Post>, Error> {
        match repo.load().await {
            Ok(posts) => Ok(posts),
            Err(PostRepositoryError::Read { message }) => {
                warn!(%message, "posts store unreadable; serving empty collection");
                Ok(Vec::new())
            }
            Err(other) => Err(Self::map_repository_error(other)),
        }
    }

    /// Run one load-modify-persist unit on the queue.
    ///
    /// `change` returns the unit's result; `persist` is skipped when it fails.
    async fn mutate<T, F>(&self, operation: &'static str, change: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&mut Vec<Post>) -> Result<T, Error> + Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        let outcome = self
            .queue
            .enqueue(async move {
                let mut posts = repo.load().await.map_err(Self::map_repository_error)?;
                let value = change(&mut posts)?;
                repo.persist(&posts)
                    .await
                    .map_err(Self::map_repository_error)?;
                debug!(operation, posts = posts.len(), "posts persisted");
                Ok::<T, Error>(value)
            })
            .await
            .map_err(Self::map_queue_error)?;
        if let Err(err) = &outcome {
            warn!(operation, code = ?err.code(), error = %err, "post mutation rejected");
        }
        outcome
    }

    async fn read<T, F, Fut>(&self, read: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(Arc<R>) -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let fut = read(Arc::clone(&self.repo));
        match self.reads {
            ReadConsistency::Relaxed => fut.await,
            ReadConsistency::Serialized => {
                self.queue.enqueue(fut).await.map_err(Self::map_queue_error)?
            }
        }
    }
}

#[async_trait]
impl<R> PostsCommand for PostsService<R>
where
    R: PostRepository + 'static,
{
    async fn create_post(&self, draft: NewPost) -> Result<Post, Error> {
        // Validate before queueing so bad input never costs a disk round-trip.
        let post = Post::create(PostId::random(), draft, self.now())?;
        let created = post.clone();
        self.mutate("create", move |posts| {
            posts.push(post);
            Ok(())
        })
        .await?;
        Ok(created)
    }

    async fn update_post(&self, id: &PostId, changes: PostChanges) -> Result<Post, Error> {
        let id = id.clone();
        let now = self.now();
        self.mutate("update", move |posts| {
            let index = Self::position(posts, &id)?;
            let post = posts
                .get_mut(index)
                .ok_or_else(|| Self::post_not_found(&id))?;
            post.apply_changes(changes, now)?;
            Ok(post.clone())
        })
        .await
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), Error> {
        let id = id.clone();
        self.mutate("delete", move |posts| {
            let index = Self::position(posts, &id)?;
            posts.remove(index);
            Ok(())
        })
        .await
    }

    async fn react(
        &self,
        id: &PostId,
        kind: ReactionKind,
        direction: ReactionDirection,
    ) -> Result<ReactionCount, Error> {
        let id = id.clone();
        let now = self.now();
        self.mutate("react", move |posts| {
            let index = Self::position(posts, &id)?;
            let post = posts
                .get_mut(index)
                .ok_or_else(|| Self::post_not_found(&id))?;
            let count = post.react(kind, direction, now);
            Ok(ReactionCount { id, kind, count })
        })
        .await
    }

    async fn add_comment(&self, id: &PostId, comment: NewComment) -> Result<Comment, Error> {
        let id = id.clone();
        let now = self.now();
        self.mutate("comment", move |posts| {
            let index = Self::position(posts, &id)?;
            let post = posts
                .get_mut(index)
                .ok_or_else(|| Self::post_not_found(&id))?;
            post.add_comment(comment, now)
        })
        .await
    }
}

#[async_trait]
impl<R> PostsQuery for PostsService<R>
where
    R: PostRepository + 'static,
{
    async fn list_posts(&self) -> Result<Vec<Post>, Error> {
        self.read(|repo| async move { Self::load_failing_open(&repo).await })
            .await
    }

    async fn get_post(&self, id: &PostId) -> Result<Post, Error> {
        let id = id.clone();
        self.read(|repo| async move {
            let posts = Self::load_failing_open(&repo).await?;
            posts
                .into_iter()
                .find(|post| post.id() == &id)
                .ok_or_else(|| Self::post_not_found(&id))
        })
        .await
    }
}

#[cfg(test)]
mod tests;
