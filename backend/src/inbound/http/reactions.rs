//! Like/dislike counter handlers.
//!
//! `POST` adds one to a counter and `DELETE` removes one, clamped at zero.
//! The response carries the authoritative count, which clients adopt in
//! place of their optimistic guess.

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{ReactionDirection, ReactionKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::posts::parse_post_id;
use crate::inbound::http::state::HttpState;

/// Authoritative like count after a change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct LikesResponse {
    /// Post the counter belongs to.
    pub id: String,
    /// Like counter after the change.
    pub likes: u64,
}

/// Authoritative dislike count after a change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct DislikesResponse {
    /// Post the counter belongs to.
    pub id: String,
    /// Dislike counter after the change.
    pub dislikes: u64,
}

async fn react(
    state: &HttpState,
    raw_id: &str,
    kind: ReactionKind,
    direction: ReactionDirection,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(raw_id)?;
    let outcome = state.posts.react(&id, kind, direction).await?;
    debug!(post_id = %outcome.id, %kind, ?direction, count = outcome.count, "reaction applied");
    let id = outcome.id.to_string();
    let response = match kind {
        ReactionKind::Like => HttpResponse::Ok().json(LikesResponse {
            id,
            likes: outcome.count,
        }),
        ReactionKind::Dislike => HttpResponse::Ok().json(DislikesResponse {
            id,
            dislikes: outcome.count,
        }),
    };
    Ok(response)
}

/// Add a like.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "New like count", body = LikesResponse),
        (status = 404, description = "No such post", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["reactions"],
    operation_id = "likePost"
)]
#[post("/posts/{id}/like")]
pub async fn like_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    react(&state, &path, ReactionKind::Like, ReactionDirection::Add).await
}

/// Withdraw a like.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}/like",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "New like count", body = LikesResponse),
        (status = 404, description = "No such post", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["reactions"],
    operation_id = "unlikePost"
)]
#[delete("/posts/{id}/like")]
pub async fn unlike_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    react(&state, &path, ReactionKind::Like, ReactionDirection::Remove).await
}

/// Add a dislike.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/dislike",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "New dislike count", body = DislikesResponse),
        (status = 404, description = "No such post", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["reactions"],
    operation_id = "dislikePost"
)]
#[post("/posts/{id}/dislike")]
pub async fn dislike_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    react(&state, &path, ReactionKind::Dislike, ReactionDirection::Add).await
}

/// Withdraw a dislike.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}/dislike",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "New dislike count", body = DislikesResponse),
        (status = 404, description = "No such post", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["reactions"],
    operation_id = "undislikePost"
)]
#[delete("/posts/{id}/dislike")]
pub async fn undislike_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    react(&state, &path, ReactionKind::Dislike, ReactionDirection::Remove).await
}
