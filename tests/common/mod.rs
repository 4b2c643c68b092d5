//! Shared test utilities for tagsift integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Stores built here are in-memory and deterministic under
//! `tokio::time::pause()`.

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
