//! Port for storing decoded images.

use async_trait::async_trait;
use thiserror::Error;

use super::StoredUpload;
use crate::domain::ImageUpload;

/// Errors raised by upload store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadStoreError {
    /// The image could not be written.
    #[error("upload store write failed: {message}")]
    Write {
        /// Adapter-specific description.
        message: String,
    },
}

impl UploadStoreError {
    /// Build a [`UploadStoreError::Write`].
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Durable storage for validated images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Store the image under a fresh name and return its public location.
    async fn save(&self, image: &ImageUpload) -> Result<StoredUpload, UploadStoreError>;
}
