//! Client side of the blog's optimistic sync protocol.
//!
//! The server is the source of truth for like and dislike counts; this
//! browser's own "I liked this" flags live in a local [`FlagStore`]. A
//! [`BlogSession`] owns both for one page lifetime, together with the
//! [`PostCache`] of the last fetched posts.
//!
//! Toggling a reaction updates the cached count and the local flag at once,
//! then asks the server. The server's count replaces the guess on success;
//! any failure restores both to their pre-toggle values.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use blog_client::{BlogSession, HttpPostsApi, MemoryFlagStore, ReactionKind, SortOrder};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpPostsApi::new("http://localhost:3000".parse()?, Duration::from_secs(5))?;
//! let session = BlogSession::new(Arc::new(api), Arc::new(MemoryFlagStore::default()));
//! session.refresh().await?;
//!
//! if let Some(post) = session.posts(SortOrder::Newest).first() {
//!     let state = session.toggle(&post.id, ReactionKind::Like).await?;
//!     println!("liked: {}, likes: {}", state.active, state.count);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod cache;
mod error;
mod flags;
mod http;
mod model;
mod reactions;
mod session;

pub use api::PostsApi;
pub use cache::{PostCache, SortOrder};
pub use error::{ClientError, ReactionError};
pub use flags::{FlagStore, MemoryFlagStore, flag_key};
pub use http::HttpPostsApi;
pub use model::{CommentView, PostView, ReactionDirection, ReactionKind};
pub use reactions::ReactionState;
pub use session::BlogSession;
