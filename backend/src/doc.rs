//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with its request and response schemas. The document backs Swagger UI in
//! debug builds and is printed by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::comments::AddCommentRequest;
use crate::inbound::http::posts::{
    CommentResponse, CreatePostRequest, PostResponse, UpdatePostRequest,
};
use crate::inbound::http::reactions::{DislikesResponse, LikesResponse};
use crate::inbound::http::uploads::{UploadRequest, UploadResponse};

/// OpenAPI document for the blog REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog backend API",
        description = "Posts, comments, like/dislike counters and image uploads backed by a single JSON document."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::reactions::like_post,
        crate::inbound::http::reactions::unlike_post,
        crate::inbound::http::reactions::dislike_post,
        crate::inbound::http::reactions::undislike_post,
        crate::inbound::http::comments::add_comment,
        crate::inbound::http::uploads::upload_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PostResponse,
        CommentResponse,
        CreatePostRequest,
        UpdatePostRequest,
        AddCommentRequest,
        LikesResponse,
        DislikesResponse,
        UploadRequest,
        UploadResponse,
    )),
    tags(
        (name = "posts", description = "Post and comment operations"),
        (name = "reactions", description = "Like and dislike counters"),
        (name = "uploads", description = "Inline image uploads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
