//! Domain-specific assertion macros for tagsift harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! tag and the sets involved.

/// Assert the exact item ids of a [`tagsift_core::ResultSet`], in id order.
///
/// ```rust
/// assert_ids!(results.hits, ["108", "42", "7"]);
/// ```
#[macro_export]
macro_rules! assert_ids {
    ($set:expr, [$($id:expr),* $(,)?]) => {{
        let set: &tagsift_core::ResultSet = &$set;
        let actual: Vec<&str> = set.item_ids().collect();
        let expected: Vec<&str> = vec![$($id),*];
        pretty_assertions::assert_eq!(actual, expected, "item ids differ");
    }};
}

/// Assert that every item of `$small` is also in `$big`.
#[macro_export]
macro_rules! assert_subset {
    ($small:expr, $big:expr) => {{
        let small: &tagsift_core::ResultSet = &$small;
        let big: &tagsift_core::ResultSet = &$big;
        if !small.is_subset(big) {
            let missing: Vec<&str> = small.item_ids().filter(|id| !big.contains(id)).collect();
            panic!(
                "assert_subset! failed: {} items missing from the larger set: {:?}",
                missing.len(),
                missing
            );
        }
    }};
}

/// Assert the exact set of names, given in any order.
///
/// ```rust
/// assert_names!(expander.descendants("Horror", true), ["PsychologicalHorror", "SurvivalHorror"]);
/// ```
#[macro_export]
macro_rules! assert_names {
    ($names:expr, [$($name:expr),* $(,)?]) => {{
        let actual: std::collections::BTreeSet<String> =
            $names.into_iter().map(|n| n.to_string()).collect();
        let expected: std::collections::BTreeSet<String> =
            [$($name),*].into_iter().map(|n: &str| n.to_string()).collect();
        pretty_assertions::assert_eq!(actual, expected, "names differ");
    }};
}
