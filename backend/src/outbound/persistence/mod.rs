//! Post persistence adapters.
//!
//! - [`JsonFilePostRepository`]: the production store, one JSON document
//!   replaced atomically on every write.
//! - [`InMemoryPostRepository`]: process-local store for tests and
//!   throwaway instances.
//!
//! The lenient on-disk record model lives in `post_record` and is private to
//! this module; the domain only ever sees normalised [`crate::domain::Post`]
//! values.

mod in_memory_post_repository;
mod json_file_post_repository;
mod post_record;

pub use in_memory_post_repository::InMemoryPostRepository;
pub use json_file_post_repository::JsonFilePostRepository;
