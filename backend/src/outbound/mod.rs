//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: the posts document on the local filesystem (plus an
//!   in-memory stand-in).
//! - **uploads**: decoded images written under a public directory.
//!
//! Both write through `atomic_write`, which stages a sibling file and
//! renames it into place. Adapters translate I/O failures into port errors
//! and hold no business rules.

pub(crate) mod atomic_write;
pub mod persistence;
pub mod uploads;
