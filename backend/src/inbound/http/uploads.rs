//! Image upload handler.
//!
//! ```text
//! POST /api/uploads {"dataUrl": "data:image/png;base64,..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request payload carrying an inline image.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

/// Where the stored image can be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Public path of the stored file.
    pub url: String,
}

/// Store an image sent as a data URL.
#[utoipa::path(
    post,
    path = "/api/uploads",
    request_body = UploadRequest,
    responses(
        (status = 201, description = "Stored image", body = UploadResponse),
        (status = 400, description = "Malformed, unsupported or oversized image", body = crate::domain::Error),
        (status = 413, description = "Body too large", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["uploads"],
    operation_id = "uploadImage"
)]
#[post("/uploads")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    payload: web::Json<UploadRequest>,
) -> ApiResult<HttpResponse> {
    let stored = state.uploads.upload_image(&payload.data_url).await?;
    Ok(HttpResponse::Created().json(UploadResponse { url: stored.url }))
}
