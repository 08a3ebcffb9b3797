//! HTTP inbound adapter exposing the blog REST endpoints.
//!
//! ```text
//! GET    /api/posts
//! GET    /api/posts/{id}
//! POST   /api/posts
//! PUT    /api/posts/{id}
//! DELETE /api/posts/{id}
//! POST   /api/posts/{id}/like      DELETE /api/posts/{id}/like
//! POST   /api/posts/{id}/dislike   DELETE /api/posts/{id}/dislike
//! POST   /api/posts/{id}/comments
//! POST   /api/uploads
//! ```

use actix_web::web;

pub mod comments;
pub mod error;
pub mod health;
pub mod json_config;
pub mod posts;
pub mod reactions;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod uploads;

pub use error::ApiResult;

/// Register every `/api` route.
///
/// Callers supply [`state::HttpState`] and a [`json_config::json_config`]
/// as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(posts::list_posts)
            .service(posts::create_post)
            .service(posts::get_post)
            .service(posts::update_post)
            .service(posts::delete_post)
            .service(reactions::like_post)
            .service(reactions::unlike_post)
            .service(reactions::dislike_post)
            .service(reactions::undislike_post)
            .service(comments::add_comment)
            .service(uploads::upload_image),
    );
}
