//! tagsift: tag search broadened by a curated tag taxonomy.
//!
//! A search for a broad tag ("Horror") also returns items tagged only with
//! narrower tags ("PsychologicalHorror") that the taxonomy declares as
//! specializations of it. This crate is the outer shell: it wires the core
//! engine to a record store from configuration and exposes it on the command
//! line and over HTTP.
//!
//! # Architecture
//!
//! ```text
//! config ──► app::build_engine ──► SearchEngine ──► report (CLI)
//!                                        │
//!                                        └────────► server (HTTP)
//! ```

pub mod app;
pub mod report;
pub mod server;

pub use app::Engine;
