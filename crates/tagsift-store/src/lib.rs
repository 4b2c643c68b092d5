//! tagsift-store: record store collaborators for the tagsift search engine.
//!
//! The engine only needs [`tagsift_core::RecordStore`]. This crate provides
//! an in-memory triple store that answers it, loaders for triple files, and
//! a wrapper that bounds each lookup with a timeout.

pub mod timeout;
pub mod triple;

pub use timeout::TimeoutStore;
pub use triple::{Triple, TripleStore, Vocabulary};
