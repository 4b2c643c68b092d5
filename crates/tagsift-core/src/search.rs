//! Search layer: literal tag lookup merged with taxonomy-expanded lookups.
//!
//! # Algorithm
//!
//! 1. Look up the literal tag in the [`RecordStore`].
//! 2. If expanding, ask the [`SubsumptionExpander`] for the full descendant
//!    closure and look up every descendant.
//! 3. Union everything into a [`ResultSet`] keyed by item id.
//!
//! Lookups, the literal one included, run concurrently and never exceed
//! [`SearchOptions::max_concurrent_lookups`] in flight. Hits are merged in a
//! fixed order (literal first, then descendants by name) so the title kept
//! for an item does not depend on which lookup finished first.
//!
//! # Failure policy
//!
//! - Literal lookup fails: the whole search fails with
//!   [`SearchError::StoreUnavailable`].
//! - A descendant lookup fails: the search returns the union of the lookups
//!   that succeeded and lists the failed tag in
//!   [`SearchResults::failed_tags`].
//! - Expansion fails internally: logged by the expander, the search proceeds
//!   unexpanded.

use crate::consistency::ValidatedTaxonomy;
use crate::error::{SearchError, StoreError};
use crate::expand::SubsumptionExpander;
use crate::store::RecordStore;
use crate::types::{ResultSet, SearchHit};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;

// ---------------------------------------------------------------------------
// Options / results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Upper bound on in-flight store lookups per search. Zero is treated as one.
    pub max_concurrent_lookups: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

/// A descendant tag whose lookup failed; its items are missing from the
/// merged result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedLookup {
    pub tag: String,
    pub error: String,
}

/// Outcome of one [`SearchEngine::search`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// The tag as searched.
    pub tag: String,
    /// Descendant tags that were looked up in addition to `tag`.
    pub expanded_tags: Vec<String>,
    #[serde(rename = "results")]
    pub hits: ResultSet,
    pub failed_tags: Vec<FailedLookup>,
}

impl SearchResults {
    /// `true` when some descendant lookups failed and `hits` is a partial union.
    pub fn is_partial(&self) -> bool {
        !self.failed_tags.is_empty()
    }
}

/// Which results exist only because the taxonomy broadened the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribution {
    pub tag: String,
    pub expanded: SearchResults,
    pub literal: SearchResults,
    /// `expanded.hits − literal.hits`.
    pub only_via_taxonomy: ResultSet,
}

// ---------------------------------------------------------------------------
// SearchEngine
// ---------------------------------------------------------------------------

/// Stateless query orchestrator over a validated taxonomy and a record store.
pub struct SearchEngine<S> {
    expander: SubsumptionExpander,
    store: S,
    options: SearchOptions,
}

impl<S: RecordStore> SearchEngine<S> {
    pub fn new(taxonomy: Arc<ValidatedTaxonomy>, store: S) -> Self {
        Self {
            expander: SubsumptionExpander::new(taxonomy),
            store,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn expander(&self) -> &SubsumptionExpander {
        &self.expander
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Descendant tag names of `tag`; see [`SubsumptionExpander::descendants`].
    pub fn descendants(&self, tag: &str, direct: bool) -> BTreeSet<String> {
        self.expander.descendants(tag, direct)
    }

    /// Items tagged `tag`, plus, when `expand` is set, items tagged with any
    /// narrower tag of `tag` in the taxonomy.
    pub async fn search(&self, tag: &str, expand: bool) -> Result<SearchResults, SearchError> {
        let expanded_tags: Vec<String> = if expand {
            self.expander.descendants(tag, false).into_iter().collect()
        } else {
            Vec::new()
        };
        for extra in &expanded_tags {
            tracing::debug!(tag, extra = %extra, "extra tag added to search");
        }

        let limit = self.options.max_concurrent_lookups.max(1);
        let lookups = std::iter::once(tag.to_string()).chain(expanded_tags.clone());
        // `buffered` keeps input order: the literal outcome comes out first.
        let mut outcomes = std::pin::pin!(stream::iter(lookups)
            .map(|lookup| async move {
                let outcome = self.store.lookup_by_tag(&lookup).await;
                (lookup, outcome)
            })
            .buffered(limit));

        let literal = match outcomes.next().await {
            Some((_, outcome)) => outcome,
            None => Ok(Vec::new()),
        };
        let literal = literal.map_err(|source| {
            tracing::warn!(tag, error = %source, "literal tag lookup failed");
            SearchError::StoreUnavailable {
                tag: tag.to_string(),
                source,
            }
        })?;
        let descendants: Vec<(String, Result<Vec<SearchHit>, StoreError>)> =
            outcomes.collect().await;

        let mut hits = ResultSet::new();
        hits.extend(literal);

        let mut failed_tags = Vec::new();
        for (extra, outcome) in descendants {
            match outcome {
                Ok(found) => hits.extend(found),
                Err(err) => {
                    tracing::warn!(tag, extra = %extra, error = %err, "expanded tag lookup failed; result is partial");
                    failed_tags.push(FailedLookup {
                        tag: extra,
                        error: err.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            tag,
            expand,
            lookups = expanded_tags.len() + 1,
            hits = hits.len(),
            failed = failed_tags.len(),
            "search complete"
        );
        Ok(SearchResults {
            tag: tag.to_string(),
            expanded_tags,
            hits,
            failed_tags,
        })
    }

    /// Run the expanded and the literal search independently and report the
    /// items only the expansion found.
    ///
    /// The two searches read the store at different moments; if it changes
    /// in between, the difference is approximate.
    pub async fn attribute(&self, tag: &str) -> Result<Attribution, SearchError> {
        let expanded = self.search(tag, true).await?;
        let literal = self.search(tag, false).await?;
        let only_via_taxonomy = expanded.hits.difference(&literal.hits);
        tracing::debug!(tag, count = only_via_taxonomy.len(), "attributed results to taxonomy");
        Ok(Attribution {
            tag: tag.to_string(),
            expanded,
            literal,
            only_via_taxonomy,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
