//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports (`PostsCommand`, `PostsQuery`, `UploadCommand`) are what
//! inbound adapters call. Driven ports (`PostRepository`, `UploadStore`) are
//! what the domain services need from storage. Driven ports expose their own
//! `thiserror` enums so adapters map failures into predictable variants.

mod post_repository;
mod posts_command;
mod posts_query;
mod upload_command;
mod upload_store;

#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use posts_command::MockPostsCommand;
pub use posts_command::{PostsCommand, ReactionCount};
#[cfg(test)]
pub use posts_query::MockPostsQuery;
pub use posts_query::PostsQuery;
pub use upload_command::{StoredUpload, UploadCommand};
#[cfg(test)]
pub use upload_store::MockUploadStore;
pub use upload_store::{UploadStore, UploadStoreError};
