//! Request middleware.
//!
//! Purpose: request lifecycle concerns that cut across every endpoint, such
//! as trace correlation.

pub mod trace;

pub use trace::Trace;
