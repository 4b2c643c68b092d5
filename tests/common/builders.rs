//! Test builders: ergonomic constructors for taxonomies and record stores.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tagsift_core::{
    ConsistencyChecker, RecordStore, SearchHit, StoreError, Taxonomy, TaxonomyDocument,
    ValidatedTaxonomy,
};

// ---------------------------------------------------------------------------
// TaxonomyBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for taxonomy fixtures.
///
/// ```rust
/// let taxonomy = TaxonomyBuilder::new()
///     .class("Horror", &[])
///     .class("PsychologicalHorror", &["Horror"])
///     .validated();
/// ```
#[derive(Default)]
pub struct TaxonomyBuilder {
    doc: TaxonomyDocument,
}

impl TaxonomyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, name: &str, parents: &[&str]) -> Self {
        self.doc = self.doc.with_class(name, parents);
        self
    }

    pub fn disjoint(mut self, a: &str, b: &str) -> Self {
        self.doc = self.doc.with_disjoint(a, b);
        self
    }

    pub fn document(self) -> TaxonomyDocument {
        self.doc
    }

    /// Resolve into a [`Taxonomy`]; panics on load errors.
    pub fn build(self) -> Taxonomy {
        Taxonomy::from_document(self.doc).expect("test taxonomy must load")
    }

    /// Resolve and validate; panics if the taxonomy is inconsistent.
    pub fn validated(self) -> Arc<ValidatedTaxonomy> {
        Arc::new(ConsistencyChecker::validate(self.build()).expect("test taxonomy must be consistent"))
    }
}

// ---------------------------------------------------------------------------
// StubStore
// ---------------------------------------------------------------------------

/// In-memory [`RecordStore`] with scripted failures and delays.
///
/// Records every tag it was asked for and the peak number of lookups in
/// flight at once.
#[derive(Default)]
pub struct StubStore {
    by_tag: HashMap<String, Vec<SearchHit>>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    default_delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag item `id` with every tag in `tags`.
    pub fn item(mut self, id: &str, title: &str, tags: &[&str]) -> Self {
        for tag in tags {
            self.by_tag
                .entry(tag.to_string())
                .or_default()
                .push(SearchHit::new(id, title));
        }
        self
    }

    /// Lookups for `tag` fail with [`StoreError::Unavailable`].
    pub fn failing(mut self, tag: &str) -> Self {
        self.failing.insert(tag.to_string());
        self
    }

    /// Lookups for `tag` sleep for `delay` before answering.
    pub fn delay(mut self, tag: &str, delay: Duration) -> Self {
        self.delays.insert(tag.to_string(), delay);
        self
    }

    /// Every lookup sleeps for `delay` unless a per-tag delay is set.
    pub fn delay_all(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    /// Tags looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for StubStore {
    async fn lookup_by_tag(&self, tag: &str) -> Result<Vec<SearchHit>, StoreError> {
        self.calls.lock().unwrap().push(tag.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(tag).copied().or(self.default_delay) {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(tag) {
            return Err(StoreError::Unavailable(format!("stub refuses {tag}")));
        }
        Ok(self.by_tag.get(tag).cloned().unwrap_or_default())
    }
}
