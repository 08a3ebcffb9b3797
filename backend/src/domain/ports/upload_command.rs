//! Driving port for image uploads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Error;

/// Where a stored upload can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUpload {
    /// Public URL (usually a path) of the stored image.
    pub url: String,
}

/// Accept a `data:` URL carrying an image and store it.
#[async_trait]
pub trait UploadCommand: Send + Sync {
    /// Validate and store the image; `invalid_upload` on bad input.
    async fn upload_image(&self, data_url: &str) -> Result<StoredUpload, Error>;
}
