//! Post CRUD handlers.
//!
//! ```text
//! GET    /api/posts
//! GET    /api/posts/{id}
//! POST   /api/posts
//! PUT    /api/posts/{id}
//! DELETE /api/posts/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Comment, Error, NewPost, Post, PostChanges, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request payload for creating a post.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Required; must not be blank.
    pub title: Option<String>,
    /// Body text; empty when omitted.
    pub content: Option<String>,
    /// Defaults to "Anonymous" when omitted or blank.
    pub author: Option<String>,
    /// Location of an uploaded image.
    pub image_url: Option<String>,
}

/// Request payload for a partial post update. Omitted fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    /// New title; must not be blank when present.
    pub title: Option<String>,
    /// New body text.
    pub content: Option<String>,
    /// New author; blank resets to "Anonymous".
    pub author: Option<String>,
    /// New image location.
    pub image_url: Option<String>,
}

/// Comment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    /// Present on comments created by this server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name of the commenter.
    pub author: String,
    /// Comment body.
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl From<Comment> for CommentResponse {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id,
            author: value.author,
            content: value.content,
            created_at: value.created_at,
        }
    }
}

/// Post as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Opaque identifier.
    pub id: String,
    /// Post title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Display name of the author.
    pub author: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds; never earlier than `createdAt`.
    pub updated_at: i64,
    /// Like counter.
    pub likes: u64,
    /// Dislike counter.
    pub dislikes: u64,
    /// Location of an uploaded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Comments in append order.
    pub comments: Vec<CommentResponse>,
}

impl From<Post> for PostResponse {
    fn from(value: Post) -> Self {
        Self {
            id: value.id().to_string(),
            title: value.title().to_owned(),
            content: value.content().to_owned(),
            author: value.author().to_owned(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
            likes: value.likes(),
            dislikes: value.dislikes(),
            image_url: value.image_url().map(str::to_owned),
            comments: value
                .comments()
                .iter()
                .cloned()
                .map(CommentResponse::from)
                .collect(),
        }
    }
}

/// Parse a path segment into a [`PostId`].
///
/// No post can carry a blank id, so a blank segment is reported as a missing
/// post.
pub(crate) fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    PostId::new(raw).map_err(|_| {
        Error::not_found(format!("post {raw:?} not found")).with_details(json!({ "id": raw }))
    })
}

/// List every post. Ordering is left to the client.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "All posts", body = [PostResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<PostResponse>>> {
    let posts = state.posts_query.list_posts().await?;
    Ok(web::Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Fetch one post.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "No such post", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = parse_post_id(&path)?;
    let post = state.posts_query.get_post(&id).await?;
    Ok(web::Json(PostResponse::from(post)))
}

/// Create a post.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created post", body = PostResponse),
        (status = 400, description = "Blank title or malformed body", body = Error),
        (status = 413, description = "Body too large", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let CreatePostRequest {
        title,
        content,
        author,
        image_url,
    } = payload.into_inner();
    let post = state
        .posts
        .create_post(NewPost {
            title: title.unwrap_or_default(),
            content: content.unwrap_or_default(),
            author,
            image_url,
        })
        .await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Update some fields of a post.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 400, description = "Blank title or malformed body", body = Error),
        (status = 404, description = "No such post", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = parse_post_id(&path)?;
    let UpdatePostRequest {
        title,
        content,
        author,
        image_url,
    } = payload.into_inner();
    let post = state
        .posts
        .update_post(
            &id,
            PostChanges {
                title,
                content,
                author,
                image_url,
            },
        )
        .await?;
    Ok(web::Json(PostResponse::from(post)))
}

/// Delete a post permanently.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "No such post", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    state.posts.delete_post(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
