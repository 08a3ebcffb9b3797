//! Image uploads delivered as `data:` URLs.
//!
//! The browser client sends images inline as
//! `data:<mime>;base64,<payload>`. [`ImageUpload::from_data_url`] validates
//! the envelope, the media type and the decoded size before anything touches
//! storage; [`UploadService`] then hands the bytes to an [`UploadStore`].

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use tracing::{error, info};

use crate::domain::Error;
use crate::domain::ports::{StoredUpload, UploadCommand, UploadStore, UploadStoreError};

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// `image/png`
    Png,
    /// `image/jpeg` (also accepted as `image/jpg`)
    Jpeg,
    /// `image/gif`
    Gif,
    /// `image/webp`
    Webp,
}

impl ImageFormat {
    /// Map a media type to a supported format.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// File extension used when storing the image.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Reason attached to `invalid_upload` errors under `details.reason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RejectReason {
    Malformed,
    UnsupportedType,
    TooLarge,
}

impl RejectReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::UnsupportedType => "unsupported_type",
            Self::TooLarge => "too_large",
        }
    }
}

fn reject(reason: RejectReason, message: impl Into<String>) -> Error {
    Error::invalid_upload(message).with_details(json!({ "reason": reason.as_str() }))
}

/// A validated, decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Parse and validate a base64 `data:` URL.
    ///
    /// # Errors
    /// Returns `invalid_upload` with `details.reason` set to `malformed`,
    /// `unsupported_type` or `too_large`.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::{ImageFormat, ImageUpload};
    ///
    /// let upload = ImageUpload::from_data_url("data:image/png;base64,iVBORw0KGgo=", 1024)
    ///     .expect("valid png envelope");
    /// assert_eq!(upload.format(), ImageFormat::Png);
    /// assert_eq!(upload.bytes().len(), 8);
    /// ```
    pub fn from_data_url(data_url: &str, max_bytes: usize) -> Result<Self, Error> {
        let rest = data_url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| reject(RejectReason::Malformed, "upload must be a data URL"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| reject(RejectReason::Malformed, "data URL has no payload"))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| reject(RejectReason::Malformed, "data URL must be base64 encoded"))?;
        let media_type = mime.split(';').next().unwrap_or_default();
        let format = ImageFormat::from_mime(media_type).ok_or_else(|| {
            reject(
                RejectReason::UnsupportedType,
                format!("unsupported image type: {media_type}"),
            )
        })?;

        // Four base64 characters carry three bytes; reject before decoding.
        let encoded_limit = max_bytes.div_ceil(3).saturating_mul(4);
        if payload.len() > encoded_limit {
            return Err(too_large(max_bytes));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|err| reject(RejectReason::Malformed, format!("invalid base64 payload: {err}")))?;
        if bytes.is_empty() {
            return Err(reject(RejectReason::Malformed, "image payload is empty"));
        }
        if bytes.len() > max_bytes {
            return Err(too_large(max_bytes));
        }
        Ok(Self { format, bytes })
    }

    /// Detected format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Decoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn too_large(max_bytes: usize) -> Error {
    reject(
        RejectReason::TooLarge,
        format!("image exceeds the {max_bytes} byte limit"),
    )
}

/// Upload use-case: validate, then store.
#[derive(Clone)]
pub struct UploadService<S> {
    store: Arc<S>,
    max_bytes: usize,
}

impl<S> UploadService<S> {
    /// Create a service enforcing `max_bytes` on decoded images.
    pub fn new(store: Arc<S>, max_bytes: usize) -> Self {
        Self { store, max_bytes }
    }
}

#[async_trait]
impl<S> UploadCommand for UploadService<S>
where
    S: UploadStore,
{
    async fn upload_image(&self, data_url: &str) -> Result<StoredUpload, Error> {
        let image = ImageUpload::from_data_url(data_url, self.max_bytes)?;
        let stored = self.store.save(&image).await.map_err(|err| match err {
            UploadStoreError::Write { message } => {
                error!(%message, "failed to store uploaded image");
                Error::internal(format!("upload store write failed: {message}"))
            }
        })?;
        info!(url = %stored.url, bytes = image.bytes().len(), "stored uploaded image");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUploadStore;
    use rstest::rstest;

    const PNG_HEADER_B64: &str = "iVBORw0KGgo=";

    fn reason(err: &Error) -> Option<&str> {
        err.details()
            .and_then(|details| details.get("reason"))
            .and_then(serde_json::Value::as_str)
    }

    #[rstest]
    #[case("data:image/png;base64,iVBORw0KGgo=", ImageFormat::Png)]
    #[case("data:image/JPEG;base64,/9j/4AAQ", ImageFormat::Jpeg)]
    #[case("data:image/gif;base64,R0lGODlh", ImageFormat::Gif)]
    #[case("data:image/webp;name=a.webp;base64,UklGRg==", ImageFormat::Webp)]
    fn accepts_supported_formats(#[case] data_url: &str, #[case] expected: ImageFormat) {
        let upload = ImageUpload::from_data_url(data_url, 1024).expect("valid upload");
        assert_eq!(upload.format(), expected);
    }

    #[rstest]
    #[case("image/png;base64,iVBORw0KGgo=", "malformed")]
    #[case("data:image/png;base64", "malformed")]
    #[case("data:image/png,iVBORw0KGgo=", "malformed")]
    #[case("data:image/png;base64,***", "malformed")]
    #[case("data:image/png;base64,", "malformed")]
    #[case("data:text/html;base64,PGgxPg==", "unsupported_type")]
    #[case("data:image/svg+xml;base64,PHN2Zz4=", "unsupported_type")]
    fn rejects_bad_uploads(#[case] data_url: &str, #[case] expected: &str) {
        let err = ImageUpload::from_data_url(data_url, 1024).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidUpload);
        assert_eq!(reason(&err), Some(expected));
    }

    #[rstest]
    fn rejects_images_over_limit() {
        let err = ImageUpload::from_data_url(&format!("data:image/png;base64,{PNG_HEADER_B64}"), 4)
            .expect_err("too large");
        assert_eq!(reason(&err), Some("too_large"));
    }

    #[rstest]
    fn accepts_image_at_exact_limit() {
        let upload =
            ImageUpload::from_data_url(&format!("data:image/png;base64,{PNG_HEADER_B64}"), 8)
                .expect("exactly at limit");
        assert_eq!(upload.bytes().len(), 8);
    }

    #[rstest]
    #[tokio::test]
    async fn service_stores_valid_images() {
        let mut store = MockUploadStore::new();
        store
            .expect_save()
            .withf(|image| image.format() == ImageFormat::Png)
            .times(1)
            .returning(|_| {
                Ok(StoredUpload {
                    url: "/uploads/x.png".to_owned(),
                })
            });
        let service = UploadService::new(Arc::new(store), 1024);

        let stored = service
            .upload_image(&format!("data:image/png;base64,{PNG_HEADER_B64}"))
            .await
            .expect("stored");
        assert_eq!(stored.url, "/uploads/x.png");
    }

    #[rstest]
    #[tokio::test]
    async fn service_does_not_store_invalid_images() {
        let mut store = MockUploadStore::new();
        store.expect_save().never();
        let service = UploadService::new(Arc::new(store), 1024);

        let err = service
            .upload_image("data:text/plain;base64,aGk=")
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InvalidUpload);
    }

    #[rstest]
    #[tokio::test]
    async fn service_maps_store_failures_to_internal() {
        let mut store = MockUploadStore::new();
        store
            .expect_save()
            .returning(|_| Err(UploadStoreError::write("disk full")));
        let service = UploadService::new(Arc::new(store), 1024);

        let err = service
            .upload_image(&format!("data:image/png;base64,{PNG_HEADER_B64}"))
            .await
            .expect_err("store failure");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
