//! Domain primitives, aggregates and use-cases.
//!
//! Purpose: hold the blog's rules independent of HTTP and storage. Inbound
//! adapters call the driving ports in [`ports`]; outbound adapters implement
//! the driven ones.
//!
//! Public surface:
//! - [`Post`], [`Comment`] and their input shapes ([`NewPost`],
//!   [`PostChanges`], [`NewComment`]).
//! - [`Error`] / [`ErrorCode`]: the API error payload.
//! - [`WriteQueue`]: FIFO serializer for read-modify-write units.
//! - [`PostsService`] and [`UploadService`]: port implementations.

pub mod error;
pub mod ports;

mod post;
mod posts_service;
mod reaction;
mod uploads;
mod write_queue;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::post::{
    Comment, DEFAULT_AUTHOR, Millis, NewComment, NewPost, Post, PostChanges, PostId,
    PostIdValidationError, PostParts,
};
pub use self::posts_service::{PostsService, ReadConsistency};
pub use self::reaction::{ReactionDirection, ReactionKind};
pub use self::uploads::{ImageFormat, ImageUpload, UploadService};
pub use self::write_queue::{WriteQueue, WriteQueueError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use blog_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such post"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
