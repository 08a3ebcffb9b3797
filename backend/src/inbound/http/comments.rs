//! Comment handler.
//!
//! ```text
//! POST /api/posts/{id}/comments
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::NewComment;
use crate::inbound::http::ApiResult;
use crate::inbound::http::posts::{CommentResponse, parse_post_id};
use crate::inbound::http::state::HttpState;

/// Request payload for adding a comment.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    /// Required; must not be blank.
    pub content: Option<String>,
    /// Defaults to "Anonymous" when omitted or blank.
    pub author: Option<String>,
}

/// Append a comment to a post.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = AddCommentRequest,
    responses(
        (status = 201, description = "Stored comment", body = CommentResponse),
        (status = 400, description = "Blank content or malformed body", body = crate::domain::Error),
        (status = 404, description = "No such post", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["posts"],
    operation_id = "addComment"
)]
#[post("/posts/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AddCommentRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let AddCommentRequest { content, author } = payload.into_inner();
    let comment = state
        .posts
        .add_comment(
            &id,
            NewComment {
                content: content.unwrap_or_default(),
                author,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}
