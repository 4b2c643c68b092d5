//! ConsistencyChecker: refuses taxonomies that contain unsatisfiable classes.
//!
//! A class is unsatisfiable when it
//!
//! - sits on a parent cycle (every member of a strongly connected component
//!   with more than one class, or with a self-loop),
//! - has two ancestors (itself included) that are declared disjoint, or
//! - has an ancestor (itself included) declared beneath a bottom class.
//!
//! The full scan runs once, before any query is served. Passing it is the
//! only way to obtain a [`ValidatedTaxonomy`], and the expander and search
//! engine accept nothing else.

use crate::error::InconsistentTaxonomyError;
use crate::taxonomy::{TagId, Taxonomy};
use std::collections::BTreeSet;
use std::ops::Deref;

/// Outcome of [`ConsistencyChecker::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyReport {
    Consistent,
    Inconsistent { offending: BTreeSet<String> },
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        matches!(self, ConsistencyReport::Consistent)
    }

    /// Names of the unsatisfiable classes, if any.
    pub fn offending(&self) -> Option<&BTreeSet<String>> {
        match self {
            ConsistencyReport::Consistent => None,
            ConsistencyReport::Inconsistent { offending } => Some(offending),
        }
    }
}

/// A taxonomy that passed [`ConsistencyChecker::validate`].
#[derive(Debug, Clone)]
pub struct ValidatedTaxonomy {
    inner: Taxonomy,
}

impl ValidatedTaxonomy {
    pub fn into_inner(self) -> Taxonomy {
        self.inner
    }
}

impl Deref for ValidatedTaxonomy {
    type Target = Taxonomy;

    fn deref(&self) -> &Taxonomy {
        &self.inner
    }
}

pub struct ConsistencyChecker;

impl ConsistencyChecker {
    /// Scan every class and report the unsatisfiable ones.
    pub fn check(taxonomy: &Taxonomy) -> ConsistencyReport {
        let mut bad = cyclic_classes(taxonomy);
        bad.extend(contradictory_classes(taxonomy));

        if bad.is_empty() {
            tracing::debug!(classes = taxonomy.len(), "taxonomy is consistent");
            return ConsistencyReport::Consistent;
        }

        let offending: BTreeSet<String> = bad
            .into_iter()
            .filter_map(|id| taxonomy.class(id))
            .map(|c| c.name().to_string())
            .collect();
        tracing::error!(count = offending.len(), ?offending, "taxonomy is inconsistent");
        ConsistencyReport::Inconsistent { offending }
    }

    /// Check `taxonomy` and, if consistent, seal it for reasoning.
    pub fn validate(taxonomy: Taxonomy) -> Result<ValidatedTaxonomy, InconsistentTaxonomyError> {
        match Self::check(&taxonomy) {
            ConsistencyReport::Consistent => Ok(ValidatedTaxonomy { inner: taxonomy }),
            ConsistencyReport::Inconsistent { offending } => {
                Err(InconsistentTaxonomyError { offending })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

/// Tarjan's SCC over parent edges, iterative so deep hierarchies cannot
/// overflow the stack.
fn cyclic_classes(taxonomy: &Taxonomy) -> BTreeSet<TagId> {
    let classes: Vec<&[TagId]> = taxonomy.classes().map(|(_, c)| c.parents()).collect();
    let n = classes.len();

    let mut order: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut next = 0usize;
    let mut cyclic = BTreeSet::new();

    for start in 0..n {
        if order[start].is_some() {
            continue;
        }
        order[start] = Some(next);
        low[start] = next;
        next += 1;
        stack.push(start);
        on_stack[start] = true;

        // (node, position of the next parent edge to follow)
        let mut work: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(frame) = work.last_mut() {
            let v = frame.0;
            let edges = classes[v];
            if frame.1 < edges.len() {
                let w = edges[frame.1].index();
                frame.1 += 1;
                match order[w] {
                    None => {
                        order[w] = Some(next);
                        low[w] = next;
                        next += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        work.push((w, 0));
                    }
                    Some(ow) if on_stack[w] => low[v] = low[v].min(ow),
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            if let Some(&(u, _)) = work.last() {
                low[u] = low[u].min(low[v]);
            }
            if order[v] == Some(low[v]) {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                let self_loop = edges.iter().any(|p| p.index() == v);
                if component.len() > 1 || self_loop {
                    cyclic.extend(component.into_iter().map(TagId::from_index));
                }
            }
        }
    }
    cyclic
}

// ---------------------------------------------------------------------------
// Disjointness / bottom
// ---------------------------------------------------------------------------

fn contradictory_classes(taxonomy: &Taxonomy) -> BTreeSet<TagId> {
    let any_axioms = taxonomy
        .classes()
        .any(|(_, c)| c.declared_empty() || !c.disjoint_with().is_empty());
    if !any_axioms {
        return BTreeSet::new();
    }

    let mut bad = BTreeSet::new();
    for (id, _) in taxonomy.classes() {
        let ancestors = ancestors_of(taxonomy, id);
        let contradiction = ancestors.iter().any(|&a| match taxonomy.class(a) {
            Some(class) => {
                class.declared_empty()
                    || class.disjoint_with().iter().any(|d| ancestors.contains(d))
            }
            None => false,
        });
        if contradiction {
            bad.insert(id);
        }
    }
    bad
}

/// Reflexive ancestor set. Terminates on cyclic input via the visited set.
fn ancestors_of(taxonomy: &Taxonomy, id: TagId) -> BTreeSet<TagId> {
    let mut seen = BTreeSet::new();
    let mut pending = vec![id];
    while let Some(next) = pending.pop() {
        if !seen.insert(next) {
            continue;
        }
        if let Some(class) = taxonomy.class(next) {
            pending.extend(class.parents().iter().copied());
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::TaxonomyDocument;
    use pretty_assertions::assert_eq;

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn check(doc: TaxonomyDocument) -> ConsistencyReport {
        ConsistencyChecker::check(&Taxonomy::from_document(doc).unwrap())
    }

    #[test]
    fn dag_is_consistent() {
        let report = check(
            TaxonomyDocument::new()
                .with_class("A", &[])
                .with_class("B", &["A"])
                .with_class("C", &["A"])
                .with_class("D", &["B", "C"]),
        );
        assert_eq!(report, ConsistencyReport::Consistent);
    }

    #[test]
    fn cycle_names_every_member_but_not_bystanders() {
        let report = check(
            TaxonomyDocument::new()
                .with_class("Root", &[])
                .with_class("A", &["C", "Root"])
                .with_class("B", &["A"])
                .with_class("C", &["B"])
                .with_class("Leaf", &["C"]),
        );
        assert_eq!(report.offending(), Some(&names(&["A", "B", "C"])));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let report = check(TaxonomyDocument::new().with_class("Loop", &["Loop"]));
        assert_eq!(report.offending(), Some(&names(&["Loop"])));
    }

    #[test]
    fn inheriting_from_disjoint_parents_is_unsatisfiable() {
        let report = check(
            TaxonomyDocument::new()
                .with_class("Horror", &[])
                .with_class("Comedy", &[])
                .with_disjoint("Horror", "Comedy")
                .with_class("HorrorComedy", &["Horror", "Comedy"])
                .with_class("Parody", &["HorrorComedy"])
                .with_class("Slasher", &["Horror"]),
        );
        assert_eq!(report.offending(), Some(&names(&["HorrorComedy", "Parody"])));
    }

    #[test]
    fn subclass_of_disjoint_sibling_is_unsatisfiable() {
        let report = check(
            TaxonomyDocument::new()
                .with_class("A", &[])
                .with_class("B", &["A"])
                .with_disjoint("B", "A"),
        );
        assert_eq!(report.offending(), Some(&names(&["B"])));
    }

    #[test]
    fn bottom_parent_propagates_to_descendants() {
        let report = check(
            TaxonomyDocument::new()
                .with_class("Void", &["Nothing"])
                .with_class("DeeperVoid", &["Void"]),
        );
        assert_eq!(report.offending(), Some(&names(&["DeeperVoid", "Void"])));
    }

    #[test]
    fn validate_refuses_inconsistent_taxonomy() {
        let taxonomy = Taxonomy::from_document(
            TaxonomyDocument::new()
                .with_class("A", &["B"])
                .with_class("B", &["A"]),
        )
        .unwrap();
        let err = ConsistencyChecker::validate(taxonomy).unwrap_err();
        assert_eq!(err.offending, names(&["A", "B"]));
        assert_eq!(
            err.to_string(),
            "taxonomy is inconsistent; unsatisfiable classes: A, B"
        );
    }
}
