//! Plain-text rendering of search outcomes for the CLI.
//!
//! Rows are sorted by item id, numerically when both ids are numbers, so
//! `7` comes before `42`. The url column appears only when a prefix is
//! configured.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use tagsift_core::{Attribution, ConsistencyReport, ResultSet, SearchResults};

// ---------------------------------------------------------------------------
// Public renderers
// ---------------------------------------------------------------------------

pub fn render_results(results: &SearchResults, url_prefix: &str) -> String {
    let mut out = String::new();
    if !results.expanded_tags.is_empty() {
        let _ = writeln!(out, "Expanded with: {}", results.expanded_tags.join(", "));
    }
    let _ = writeln!(out, "Results for {} ({}):", results.tag, results.hits.len());
    out.push_str(&render_table(&results.hits, url_prefix));
    for failed in &results.failed_tags {
        let _ = writeln!(out, "warning: lookup for {} failed: {}", failed.tag, failed.error);
    }
    out
}

pub fn render_attribution(attribution: &Attribution, url_prefix: &str) -> String {
    let mut out = render_results(&attribution.expanded, url_prefix);
    out.push('\n');
    if attribution.only_via_taxonomy.is_empty() {
        out.push_str("No results would have been left out without the taxonomy.\n");
    } else {
        let _ = writeln!(
            out,
            "These {} results would have been left out without the taxonomy:",
            attribution.only_via_taxonomy.len()
        );
        out.push_str(&render_table(&attribution.only_via_taxonomy, url_prefix));
    }
    out
}

pub fn render_descendants(tag: &str, direct: bool, descendants: &BTreeSet<String>) -> String {
    let kind = if direct { "Direct subtags" } else { "Subtags" };
    let mut out = String::new();
    if descendants.is_empty() {
        let _ = writeln!(out, "{kind} of {tag}: none");
        return out;
    }
    let _ = writeln!(out, "{kind} of {tag} ({}):", descendants.len());
    for name in descendants {
        let _ = writeln!(out, "  {name}");
    }
    out
}

/// Hint shown when a searched tag is not a taxonomy class.
pub fn render_unknown_tag(tag: &str, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        format!("{tag} is not in the taxonomy; searching it as a plain tag.\n")
    } else {
        format!(
            "{tag} is not in the taxonomy; searching it as a plain tag. Did you mean: {}?\n",
            suggestions.join(", ")
        )
    }
}

pub fn render_consistency(report: &ConsistencyReport, class_count: usize) -> String {
    match report.offending() {
        None => format!("Taxonomy is consistent ({class_count} classes).\n"),
        Some(offending) => {
            let mut out = format!("Taxonomy is inconsistent; {} unsatisfiable classes:\n", offending.len());
            for name in offending {
                let _ = writeln!(out, "  {name}");
            }
            out
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn render_table(hits: &ResultSet, url_prefix: &str) -> String {
    let mut out = String::new();
    if url_prefix.is_empty() {
        let _ = writeln!(out, "{:<8} {}", "Id", "Title");
    } else {
        let _ = writeln!(out, "{:<8} {:<40} {}", "Id", "Title", "Url");
    }
    for (id, title) in sorted_rows(hits) {
        if url_prefix.is_empty() {
            let _ = writeln!(out, "{id:<8} {title}");
        } else {
            let _ = writeln!(out, "{id:<8} {title:<40} {url_prefix}{id}");
        }
    }
    out
}

fn sorted_rows(hits: &ResultSet) -> Vec<(&str, &str)> {
    let mut rows: Vec<(&str, &str)> = hits.iter().collect();
    rows.sort_by(|a, b| compare_ids(a.0, b.0));
    rows
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagsift_core::{FailedLookup, SearchHit};

    fn results(tag: &str, hits: &[(&str, &str)]) -> SearchResults {
        SearchResults {
            tag: tag.to_string(),
            expanded_tags: Vec::new(),
            hits: hits.iter().map(|&(id, title)| SearchHit::new(id, title)).collect(),
            failed_tags: Vec::new(),
        }
    }

    #[test]
    fn ids_sort_numerically() {
        let set: ResultSet = [
            SearchHit::new("42", "Soma"),
            SearchHit::new("7", "Saw"),
            SearchHit::new("abc", "Untracked"),
            SearchHit::new("100", "Amnesia"),
        ]
        .into_iter()
        .collect();
        let ids: Vec<&str> = sorted_rows(&set).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["7", "42", "100", "abc"]);
    }

    #[test]
    fn table_without_prefix_has_no_url_column() {
        let text = render_results(&results("Horror", &[("7", "Saw")]), "");
        assert_eq!(text, "Results for Horror (1):\nId       Title\n7        Saw\n");
    }

    #[test]
    fn table_with_prefix_links_items() {
        let text = render_results(
            &results("Horror", &[("7", "Saw")]),
            "https://store.example/app/",
        );
        assert!(text.contains("https://store.example/app/7"), "{text}");
        assert!(text.contains("Url"));
    }

    #[test]
    fn partial_results_are_flagged() {
        let mut partial = results("Horror", &[("7", "Saw")]);
        partial.expanded_tags = vec!["PsychologicalHorror".into()];
        partial.failed_tags.push(FailedLookup {
            tag: "PsychologicalHorror".into(),
            error: "record store unavailable: down".into(),
        });
        let text = render_results(&partial, "");
        assert!(text.starts_with("Expanded with: PsychologicalHorror\n"));
        assert!(text.contains("warning: lookup for PsychologicalHorror failed"));
    }

    #[test]
    fn attribution_lists_taxonomy_only_items() {
        let expanded = results("Horror", &[("7", "Saw"), ("42", "Soma")]);
        let literal = results("Horror", &[("7", "Saw")]);
        let only_via_taxonomy = expanded.hits.difference(&literal.hits);
        let text = render_attribution(
            &Attribution {
                tag: "Horror".into(),
                expanded,
                literal,
                only_via_taxonomy,
            },
            "",
        );
        assert!(text.contains("These 1 results would have been left out without the taxonomy:"));
        assert!(text.ends_with("42       Soma\n"), "{text}");
    }

    #[test]
    fn unknown_tag_offers_suggestions() {
        assert_eq!(
            render_unknown_tag("Horr", &["Horror".into()]),
            "Horr is not in the taxonomy; searching it as a plain tag. Did you mean: Horror?\n"
        );
        assert!(!render_unknown_tag("Zzz", &[]).contains("Did you mean"));
    }

    #[test]
    fn descendants_listing() {
        let set: BTreeSet<String> = ["CosmicHorror".to_string()].into();
        assert_eq!(
            render_descendants("Horror", false, &set),
            "Subtags of Horror (1):\n  CosmicHorror\n"
        );
        assert_eq!(
            render_descendants("Saw", true, &BTreeSet::new()),
            "Direct subtags of Saw: none\n"
        );
    }
}
