//! Error types for every layer of the core.
//!
//! Load and consistency errors are fatal: no search may be served from a
//! taxonomy that produced one. Reasoning and store errors degrade a search
//! instead of aborting it, except for the literal-tag lookup, which is
//! surfaced as [`SearchError::StoreUnavailable`].

use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// The taxonomy source could not be turned into a [`crate::Taxonomy`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read taxonomy source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed taxonomy document: {0}")]
    Malformed(String),

    #[error("unsupported taxonomy format {0:?} (expected .json, .owl, .rdf or .xml)")]
    UnsupportedFormat(String),

    #[error("duplicate class name {0:?}")]
    DuplicateName(String),

    #[error("class {class:?} references undeclared class {missing:?}")]
    DanglingReference { class: String, missing: String },

    #[error("class names must not be empty")]
    EmptyName,

    #[error("class name {0:?} is reserved for a built-in class")]
    ReservedName(String),

    #[error("failed to build the class name index: {0}")]
    Index(#[from] fst::Error),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}

impl From<quick_xml::Error> for LoadError {
    fn from(err: quick_xml::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}

/// The taxonomy loaded but contains unsatisfiable classes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("taxonomy is inconsistent; unsatisfiable classes: {}", join_names(.offending))]
pub struct InconsistentTaxonomyError {
    pub offending: BTreeSet<String>,
}

fn join_names(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// [`crate::Taxonomy::lookup`] was given a name the taxonomy does not declare.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no class named {0:?} in the taxonomy")]
pub struct NotFound(pub String);

/// Internal failure while computing a descendant closure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReasoningError {
    #[error("class index {0} is outside the taxonomy")]
    DanglingIndex(usize),
}

/// Failure reported by a [`crate::RecordStore`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("lookup for tag {tag:?} timed out after {timeout_ms} ms")]
    Timeout { tag: String, timeout_ms: u64 },

    #[error("malformed record data at {location}: {reason}")]
    Malformed { location: String, reason: String },
}

/// A search could not produce even a partial result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("lookup for tag {tag:?} failed: {source}")]
    StoreUnavailable {
        tag: String,
        #[source]
        source: StoreError,
    },
}
