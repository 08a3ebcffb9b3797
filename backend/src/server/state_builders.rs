//! Builders wiring outbound adapters into the HTTP state.

use std::io;
use std::sync::Arc;

use mockable::DefaultClock;
use tracing::info;

use blog_backend::domain::{PostsService, UploadService};
use blog_backend::inbound::http::state::HttpState;
use blog_backend::outbound::persistence::JsonFilePostRepository;
use blog_backend::outbound::uploads::FsUploadStore;

use super::ServerConfig;

/// Open the posts store and upload directory and build the handler state.
///
/// The store is created here, once per process; the first boot writes an
/// empty document.
///
/// # Errors
/// Returns an I/O error when either location cannot be prepared.
///
/// # Panics
/// Panics when called outside a Tokio runtime.
pub(crate) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let repo = JsonFilePostRepository::open(&config.data_file).map_err(io::Error::other)?;
    let uploads = FsUploadStore::open(&config.uploads_dir, config.uploads_url_prefix.clone())
        .map_err(io::Error::other)?;
    info!(
        data_file = %config.data_file,
        uploads_dir = %config.uploads_dir,
        reads = ?config.reads,
        "storage ready"
    );

    let posts = Arc::new(
        PostsService::new(Arc::new(repo), Arc::new(DefaultClock))
            .with_read_consistency(config.reads),
    );
    let uploads = Arc::new(UploadService::new(
        Arc::new(uploads),
        config.max_upload_bytes,
    ));
    Ok(HttpState::new(posts.clone(), posts, uploads))
}
