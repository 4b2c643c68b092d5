//! Core result types shared by the search engine, the record stores and the
//! presentation layer.
//!
//! A [`SearchHit`] is one `(item_id, title)` pair. A [`ResultSet`] is a set of
//! hits keyed by item identity: inserting a second hit for an item that is
//! already present is a no-op, so overlapping tag lookups collapse to a single
//! entry.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// One catalog item matched by a tag lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SearchHit {
    pub item_id: String,
    pub title: String,
}

impl SearchHit {
    pub fn new(item_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            title: title.into(),
        }
    }
}

impl<I: Into<String>, T: Into<String>> From<(I, T)> for SearchHit {
    fn from((item_id, title): (I, T)) -> Self {
        Self::new(item_id, title)
    }
}

// ---------------------------------------------------------------------------
// ResultSet
// ---------------------------------------------------------------------------

/// Set of search hits, unique by `item_id`.
///
/// The first title seen for an item is kept. Iteration order is the lexical
/// order of item ids, which is stable but carries no meaning; presentation
/// code sorts explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: BTreeMap<String, String>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a hit. Returns `false` if the item was already present.
    pub fn insert(&mut self, hit: SearchHit) -> bool {
        match self.entries.entry(hit.item_id) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(hit.title);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.entries.contains_key(item_id)
    }

    /// Title recorded for `item_id`, if the item is in the set.
    pub fn title(&self, item_id: &str) -> Option<&str> {
        self.entries.get(item_id).map(String::as_str)
    }

    /// Iterate as `(item_id, title)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, title)| (id.as_str(), title.as_str()))
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Hits present in `self` whose item id is absent from `other`.
    pub fn difference(&self, other: &ResultSet) -> ResultSet {
        self.entries
            .iter()
            .filter(|(id, _)| !other.contains(id))
            .map(|(id, title)| SearchHit::new(id.clone(), title.clone()))
            .collect()
    }

    /// `true` when every item id of `self` is also in `other`.
    pub fn is_subset(&self, other: &ResultSet) -> bool {
        self.entries.keys().all(|id| other.contains(id))
    }

    pub fn to_hits(&self) -> Vec<SearchHit> {
        self.iter().map(|(id, title)| SearchHit::new(id, title)).collect()
    }
}

impl Extend<SearchHit> for ResultSet {
    fn extend<T: IntoIterator<Item = SearchHit>>(&mut self, iter: T) {
        for hit in iter {
            self.insert(hit);
        }
    }
}

impl FromIterator<SearchHit> for ResultSet {
    fn from_iter<T: IntoIterator<Item = SearchHit>>(iter: T) -> Self {
        let mut set = ResultSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for ResultSet {
    type Item = SearchHit;
    type IntoIter = std::iter::Map<
        std::collections::btree_map::IntoIter<String, String>,
        fn((String, String)) -> SearchHit,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .into_iter()
            .map(into_hit as fn((String, String)) -> SearchHit)
    }
}

fn into_hit((item_id, title): (String, String)) -> SearchHit {
    SearchHit { item_id, title }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_hits())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_item_ids_collapse_and_keep_first_title() {
        let mut set = ResultSet::new();
        assert!(set.insert(SearchHit::new("42", "Soma")));
        assert!(!set.insert(SearchHit::new("42", "SOMA (re-release)")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.title("42"), Some("Soma"));
    }

    #[test]
    fn difference_is_keyed_by_item_id() {
        let expanded: ResultSet = [("7", "Saw"), ("42", "Soma")]
            .into_iter()
            .map(SearchHit::from)
            .collect();
        let literal: ResultSet = [("7", "Saw")].into_iter().map(SearchHit::from).collect();

        let only = expanded.difference(&literal);
        assert_eq!(only.to_hits(), vec![SearchHit::new("42", "Soma")]);
        assert!(literal.is_subset(&expanded));
        assert!(!expanded.is_subset(&literal));
    }

    #[test]
    fn serializes_as_list_of_hits() {
        let set: ResultSet = [("7", "Saw")].into_iter().map(SearchHit::from).collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!([{ "item_id": "7", "title": "Saw" }]));
    }
}
