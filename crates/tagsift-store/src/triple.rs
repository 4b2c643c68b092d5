//! In-memory triple store.
//!
//! Facts are `(subject, predicate, object)` triples. A tag lookup answers the
//! pattern
//!
//! ```text
//! ?item <tag>   "Horror" .
//! ?item <title> ?title   .
//! ```
//!
//! so an item is returned only if it has both the tag and a title. The
//! predicate names are configurable through [`Vocabulary`].
//!
//! # File formats
//!
//! - `.json` (any case): `[{"subject": "42", "predicate": "tag", "object": "Horror"}, …]`
//! - anything else: one `subject<TAB>predicate<TAB>object` per line; blank
//!   lines and lines starting with `#` are ignored.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use tagsift_core::{RecordStore, SearchHit, StoreError};
use tokio::sync::RwLock;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Predicate names that mark a tag and a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub tag: String,
    pub title: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            tag: "tag".to_string(),
            title: "title".to_string(),
        }
    }
}

/// Indexed facts. Only tag and title triples are indexed; every triple is
/// kept for dedup and counting.
#[derive(Debug, Default)]
struct Facts {
    triples: HashSet<Triple>,
    tagged: HashMap<String, BTreeSet<String>>,
    titles: HashMap<String, String>,
}

impl Facts {
    fn insert(&mut self, vocabulary: &Vocabulary, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        if triple.predicate == vocabulary.tag {
            self.tagged
                .entry(triple.object.clone())
                .or_default()
                .insert(triple.subject.clone());
        } else if triple.predicate == vocabulary.title {
            self.titles
                .entry(triple.subject.clone())
                .or_insert_with(|| triple.object.clone());
        }
        self.triples.insert(triple)
    }
}

// ---------------------------------------------------------------------------
// TripleStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TripleStore {
    vocabulary: Vocabulary,
    facts: RwLock<Facts>,
}

impl TripleStore {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            facts: RwLock::new(Facts::default()),
        }
    }

    pub fn from_triples(vocabulary: Vocabulary, triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut facts = Facts::default();
        for triple in triples {
            facts.insert(&vocabulary, triple);
        }
        Self {
            vocabulary,
            facts: RwLock::new(facts),
        }
    }

    /// Read a triple file; the extension selects the format (see module docs).
    pub async fn load(path: &Path, vocabulary: Vocabulary) -> Result<Self, StoreError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| StoreError::Unavailable(format!("{}: {err}", path.display())))?;
        let location = path.display().to_string();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let triples = match ext.as_str() {
            "json" => parse_json(&content, &location)?,
            _ => parse_tsv(&content, &location)?,
        };
        let count = triples.len();
        let store = Self::from_triples(vocabulary, triples);
        tracing::info!(path = %path.display(), triples = count, "record store loaded");
        Ok(store)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Add one fact. Returns `false` if it was already present.
    pub async fn insert(&self, triple: Triple) -> bool {
        self.facts.write().await.insert(&self.vocabulary, triple)
    }

    /// Add many facts under a single write lock. Returns how many were new.
    pub async fn extend(&self, triples: impl IntoIterator<Item = Triple>) -> usize {
        let mut facts = self.facts.write().await;
        let mut added = 0;
        for triple in triples {
            if facts.insert(&self.vocabulary, triple) {
                added += 1;
            }
        }
        added
    }

    /// Drop every fact.
    pub async fn clear(&self) {
        *self.facts.write().await = Facts::default();
    }

    pub async fn len(&self) -> usize {
        self.facts.read().await.triples.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecordStore for TripleStore {
    async fn lookup_by_tag(&self, tag: &str) -> Result<Vec<SearchHit>, StoreError> {
        let facts = self.facts.read().await;
        let Some(subjects) = facts.tagged.get(tag) else {
            return Ok(Vec::new());
        };
        Ok(subjects
            .iter()
            .filter_map(|subject| {
                facts
                    .titles
                    .get(subject)
                    .map(|title| SearchHit::new(subject.clone(), title.clone()))
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// Parse tab-separated triples. `location` names the source in errors.
pub fn parse_tsv(content: &str, location: &str) -> Result<Vec<Triple>, StoreError> {
    let mut triples = Vec::new();
    for (n, line) in content.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split('\t').collect();
        match parts.as_slice() {
            [s, p, o] if !s.is_empty() && !p.is_empty() => triples.push(Triple::new(*s, *p, *o)),
            _ => {
                return Err(StoreError::Malformed {
                    location: format!("{location}:{}", n + 1),
                    reason: format!("expected subject<TAB>predicate<TAB>object, got {line:?}"),
                })
            }
        }
    }
    Ok(triples)
}

/// Parse a JSON array of triples.
pub fn parse_json(content: &str, location: &str) -> Result<Vec<Triple>, StoreError> {
    serde_json::from_str(content).map_err(|err| StoreError::Malformed {
        location: location.to_string(),
        reason: err.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
