//! Filesystem image store.

use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ImageUpload;
use crate::domain::ports::{StoredUpload, UploadStore, UploadStoreError};
use crate::outbound::atomic_write::write_atomic;

/// Writes each image as `<uuid>.<ext>` under one directory and reports it
/// at `<url_prefix>/<file>`.
#[derive(Debug, Clone)]
pub struct FsUploadStore {
    dir: Arc<Dir>,
    root: Utf8PathBuf,
    url_prefix: String,
}

impl FsUploadStore {
    /// Open (creating if needed) the upload directory.
    ///
    /// # Errors
    /// Returns [`UploadStoreError::Write`] when the directory cannot be
    /// created or opened.
    pub fn open(
        root: impl AsRef<Utf8Path>,
        url_prefix: impl Into<String>,
    ) -> Result<Self, UploadStoreError> {
        let root = root.as_ref().to_path_buf();
        let dir = Dir::create_ambient_dir_all(&root, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(&root, ambient_authority()))
            .map_err(|err| UploadStoreError::write(format!("{root}: {err}")))?;
        Ok(Self {
            dir: Arc::new(dir),
            root,
            url_prefix: url_prefix.into(),
        })
    }

    /// Directory images are written to.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn public_url(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.url_prefix.trim_end_matches('/'))
    }
}

#[async_trait]
impl UploadStore for FsUploadStore {
    async fn save(&self, image: &ImageUpload) -> Result<StoredUpload, UploadStoreError> {
        let file_name = format!("{}.{}", Uuid::new_v4(), image.format().extension());
        let dir = Arc::clone(&self.dir);
        let bytes = image.bytes().to_vec();
        let target = Utf8PathBuf::from(&file_name);
        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &bytes))
            .await
            .map_err(|err| UploadStoreError::write(err.to_string()))?
            .map_err(|err| UploadStoreError::write(err.to_string()))?;
        debug!(root = %self.root, file = %file_name, "image written");
        Ok(StoredUpload {
            url: self.public_url(&file_name),
        })
    }
}
