//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;

use crate::Trace;
use crate::domain::ports::{StoredUpload, UploadCommand};
use crate::domain::{Error, ImageUpload, PostsService};
use crate::inbound::http::json_config::json_config;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::InMemoryPostRepository;

/// Body limit used by handler tests.
pub(crate) const TEST_BODY_LIMIT: usize = 64 * 1024;

/// Upload port that validates like the real service but stores nothing.
pub(crate) struct DiscardingUploads;

#[async_trait::async_trait]
impl UploadCommand for DiscardingUploads {
    async fn upload_image(&self, data_url: &str) -> Result<StoredUpload, Error> {
        let image = ImageUpload::from_data_url(data_url, 1024)?;
        Ok(StoredUpload {
            url: format!("/uploads/test.{}", image.format().extension()),
        })
    }
}

/// State backed by a fresh in-memory store.
///
/// # Panics
/// Panics when called outside a Tokio runtime.
pub(crate) fn in_memory_state() -> HttpState {
    let service = Arc::new(PostsService::new(
        Arc::new(InMemoryPostRepository::default()),
        Arc::new(DefaultClock),
    ));
    HttpState::new(service.clone(), service, Arc::new(DiscardingUploads))
}

/// App wired like the server: trace middleware, JSON limits and `/api`.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config(TEST_BODY_LIMIT))
        .wrap(Trace)
        .configure(super::configure)
}
