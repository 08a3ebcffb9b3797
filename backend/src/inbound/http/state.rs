//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only depend on driving
//! ports, so they stay testable without touching the filesystem.

use std::sync::Arc;

use crate::domain::ports::{PostsCommand, PostsQuery, UploadCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Post mutations.
    pub posts: Arc<dyn PostsCommand>,
    /// Post reads.
    pub posts_query: Arc<dyn PostsQuery>,
    /// Image uploads.
    pub uploads: Arc<dyn UploadCommand>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        posts: Arc<dyn PostsCommand>,
        posts_query: Arc<dyn PostsQuery>,
        uploads: Arc<dyn UploadCommand>,
    ) -> Self {
        Self {
            posts,
            posts_query,
            uploads,
        }
    }
}
