//! Core domain entities.
//!
//! Entities are plain data structures. Creation input lives in a separate
//! struct so store-assigned fields (`id`, timestamps, counters) cannot be
//! supplied by callers.
//!
//! - [`Link`] - A stored short link
//! - [`NewLink`] - Data needed to create one

pub mod link;

pub use link::{Link, NewLink};
