//! tagsift-core: taxonomy-expanded tag search.
//!
//! This crate owns the reasoning half of tagsift: the in-memory tag taxonomy,
//! its consistency rules, the subsumption closure that broadens a tag into its
//! narrower tags, and the search merge that unions record-store lookups.
//!
//! # Architecture
//!
//! ```text
//! TaxonomySource ──► Taxonomy ──► ConsistencyChecker ──► ValidatedTaxonomy
//!                                                            │
//!                                                 SubsumptionExpander
//!                                                            │
//!                          RecordStore ◄────────────── SearchEngine
//! ```
//!
//! The taxonomy is loaded and validated once per process, then shared
//! read-only behind an `Arc`. Every search is a stateless function of the
//! taxonomy and the record store.

pub mod config;
pub mod consistency;
pub mod error;
pub mod expand;
pub mod search;
pub mod store;
pub mod taxonomy;
pub mod types;

pub use consistency::{ConsistencyChecker, ConsistencyReport, ValidatedTaxonomy};
pub use error::{
    InconsistentTaxonomyError, LoadError, NotFound, ReasoningError, SearchError, StoreError,
};
pub use expand::SubsumptionExpander;
pub use search::{Attribution, FailedLookup, SearchEngine, SearchOptions, SearchResults};
pub use store::RecordStore;
pub use taxonomy::{TagClass, TagId, Taxonomy, TaxonomyDocument, TaxonomySource};
pub use types::{ResultSet, SearchHit};
