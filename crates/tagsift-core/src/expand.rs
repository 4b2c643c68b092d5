//! SubsumptionExpander: broadens a tag into its narrower tags.
//!
//! # Algorithm
//!
//! 1. Resolve the tag name against the taxonomy index. Unknown names expand
//!    to nothing: the tag may still exist as a free-form label in the record
//!    store.
//! 2. `direct = true`: return the immediate children.
//! 3. `direct = false`: breadth-first walk over child edges with a visited
//!    bitmap, so a class reachable through several paths (diamond
//!    inheritance) is visited once. Termination is bounded by the class
//!    count; the validated taxonomy is acyclic anyway.
//! 4. The queried class and built-in classes are never part of the result.
//!
//! Internal failures are logged and collapse to an empty expansion; a search
//! then degrades to its literal-tag results.

use crate::consistency::ValidatedTaxonomy;
use crate::error::ReasoningError;
use crate::taxonomy::{is_built_in, TagId, Taxonomy};
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

/// Pure descendant queries over a shared, validated taxonomy. Cheap to clone
/// and safe to call from any number of tasks at once.
#[derive(Debug, Clone)]
pub struct SubsumptionExpander {
    taxonomy: Arc<ValidatedTaxonomy>,
}

impl SubsumptionExpander {
    pub fn new(taxonomy: Arc<ValidatedTaxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Best-effort descendants of `class_name`. Never fails: a reasoning
    /// error is logged and reported as an empty set.
    pub fn descendants(&self, class_name: &str, direct: bool) -> BTreeSet<String> {
        match self.try_descendants(class_name, direct) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(tag = class_name, direct, error = %err, "expansion failed; searching without it");
                BTreeSet::new()
            }
        }
    }

    /// Descendants of `class_name`, surfacing internal failures.
    pub fn try_descendants(
        &self,
        class_name: &str,
        direct: bool,
    ) -> Result<BTreeSet<String>, ReasoningError> {
        let Some(id) = self.taxonomy.id_of(class_name) else {
            tracing::debug!(tag = class_name, "tag is not present in the taxonomy");
            return Ok(BTreeSet::new());
        };
        let found = descendant_closure(&self.taxonomy, id, direct)?;
        tracing::debug!(tag = class_name, direct, count = found.len(), "expanded tag");
        Ok(found)
    }
}

/// Children (`direct`) or the transitive child closure of `root`, by name.
pub(crate) fn descendant_closure(
    taxonomy: &Taxonomy,
    root: TagId,
    direct: bool,
) -> Result<BTreeSet<String>, ReasoningError> {
    let root_class = taxonomy
        .class(root)
        .ok_or(ReasoningError::DanglingIndex(root.index()))?;
    let mut found = BTreeSet::new();

    if direct {
        for &child in root_class.children() {
            if child == root {
                continue;
            }
            let class = taxonomy
                .class(child)
                .ok_or(ReasoningError::DanglingIndex(child.index()))?;
            if !is_built_in(class.name()) {
                found.insert(class.name().to_string());
            }
        }
        return Ok(found);
    }

    let mut visited = vec![false; taxonomy.len()];
    visited[root.index()] = true;
    let mut queue: VecDeque<TagId> = root_class.children().iter().copied().collect();

    while let Some(id) = queue.pop_front() {
        let seen = visited
            .get_mut(id.index())
            .ok_or(ReasoningError::DanglingIndex(id.index()))?;
        if *seen {
            continue;
        }
        *seen = true;

        let class = taxonomy
            .class(id)
            .ok_or(ReasoningError::DanglingIndex(id.index()))?;
        if !is_built_in(class.name()) {
            found.insert(class.name().to_string());
        }
        queue.extend(class.children().iter().copied());
    }
    Ok(found)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
