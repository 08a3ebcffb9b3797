//! Port for the persisted post collection.
//!
//! The collection is stored as one document, so the contract is whole-value:
//! `load` returns every post and `persist` replaces every post. Callers are
//! responsible for serialising read-modify-write sequences (see
//! [`crate::domain::WriteQueue`]).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Post;

/// Errors raised by post repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostRepositoryError {
    /// The stored collection could not be read.
    #[error("posts store read failed: {message}")]
    Read {
        /// Adapter-specific description.
        message: String,
    },
    /// The collection could not be written; the previous state is intact.
    #[error("posts store write failed: {message}")]
    Write {
        /// Adapter-specific description.
        message: String,
    },
}

impl PostRepositoryError {
    /// Build a [`PostRepositoryError::Read`].
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// Build a [`PostRepositoryError::Write`].
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Whole-collection storage for posts.
///
/// # Atomicity
///
/// `persist` must be all-or-nothing: after a failure, `load` returns exactly
/// what it returned before the call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Load every stored post.
    ///
    /// A store that does not exist yet, or holds unparsable data, may load as
    /// an empty collection. A store that exists but cannot be read must
    /// return [`PostRepositoryError::Read`] so no write is built on top of a
    /// partial view.
    async fn load(&self) -> Result<Vec<Post>, PostRepositoryError>;

    /// Replace the stored collection with `posts`.
    async fn persist(&self, posts: &[Post]) -> Result<(), PostRepositoryError>;
}
