//! OWL RDF/XML reader.
//!
//! Reads the subset of RDF/XML an ontology editor emits for a plain class
//! hierarchy:
//!
//! ```xml
//! <owl:Class rdf:about="http://example.org/games#PsychologicalHorror">
//!     <rdfs:subClassOf rdf:resource="http://example.org/games#Horror"/>
//!     <owl:disjointWith rdf:resource="http://example.org/games#Comedy"/>
//! </owl:Class>
//! ```
//!
//! Class names are IRI fragments, so a document is expected to use a single
//! namespace for its classes. Two absolute IRIs that share a fragment but
//! differ in namespace are rejected with [`LoadError::DuplicateName`];
//! relative references (`#Horror`, `rdf:ID="Horror"`) match any namespace.
//! Built-in `owl:Thing` / `owl:Nothing` references are exempt.
//!
//! Anonymous classes, property restrictions and every other axiom are
//! skipped. That includes `owl:AllDisjointClasses`: only pairwise
//! `owl:disjointWith` is read, so disjointness declared the Protégé
//! group way is not checked. A class that is described by several top-level
//! elements accumulates all of their edges.

use super::document::{ClassDecl, TaxonomyDocument};
use crate::error::LoadError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Depth of the `owl:Class` elements under the `rdf:RDF` root.
const CLASS_DEPTH: usize = 1;

const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";

pub fn parse_owl_xml(content: &str) -> Result<TaxonomyDocument, LoadError> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut doc = DocumentBuilder::default();
    let mut current: Option<String> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                on_element(&e, depth, true, &mut current, &mut doc)?;
                depth += 1;
            }
            Event::Empty(e) => on_element(&e, depth, false, &mut current, &mut doc)?,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == CLASS_DEPTH {
                    current = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(LoadError::Malformed("unexpected end of RDF/XML document".into()));
    }
    Ok(doc.finish())
}

fn on_element(
    e: &BytesStart<'_>,
    depth: usize,
    opens: bool,
    current: &mut Option<String>,
    doc: &mut DocumentBuilder,
) -> Result<(), LoadError> {
    let local = e.local_name();
    match (depth, local.as_ref()) {
        (CLASS_DEPTH, b"Class") => {
            let Some(iri) = attribute(e, &[b"about", b"ID"])? else {
                return Ok(());
            };
            let name = doc.name_of(&iri)?;
            doc.declare(&name);
            if opens {
                *current = Some(name);
            }
        }
        (d, b"subClassOf") if d == CLASS_DEPTH + 1 => {
            if let (Some(class), Some(iri)) = (current.as_deref(), attribute(e, &[b"resource"])?) {
                let parent = doc.name_of(&iri)?;
                doc.add_parent(class, &parent);
            }
        }
        (d, b"disjointWith") if d == CLASS_DEPTH + 1 => {
            if let (Some(class), Some(iri)) = (current.as_deref(), attribute(e, &[b"resource"])?) {
                let other = doc.name_of(&iri)?;
                doc.add_disjoint(class, &other);
            }
        }
        _ => {}
    }
    Ok(())
}

fn attribute(e: &BytesStart<'_>, keys: &[&[u8]]) -> Result<Option<String>, LoadError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| LoadError::Malformed(err.to_string()))?;
        if keys.contains(&attr.key.local_name().as_ref()) {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// `(namespace, fragment)`: split after the last `#`, else after the last
/// `/`. The namespace is empty for a relative reference.
fn split_iri(iri: &str) -> (&str, &str) {
    iri.rsplit_once('#')
        .or_else(|| iri.rsplit_once('/'))
        .unwrap_or(("", iri))
}

// ---------------------------------------------------------------------------
// Order-preserving declaration merge
// ---------------------------------------------------------------------------

#[derive(Default)]
struct DocumentBuilder {
    classes: Vec<ClassDecl>,
    index: HashMap<String, usize>,
    /// Fragment -> the first absolute namespace it was seen under.
    namespaces: HashMap<String, String>,
}

impl DocumentBuilder {
    /// Class name for `iri`, refusing a fragment already bound to another
    /// namespace.
    fn name_of(&mut self, iri: &str) -> Result<String, LoadError> {
        let (namespace, name) = split_iri(iri);
        if namespace.is_empty() || namespace == OWL_NS.trim_end_matches('#') {
            return Ok(name.to_string());
        }
        match self.namespaces.get(name) {
            Some(seen) if seen != namespace => {
                tracing::warn!(name, first = %seen, second = namespace, "class fragment used under two namespaces");
                Err(LoadError::DuplicateName(name.to_string()))
            }
            Some(_) => Ok(name.to_string()),
            None => {
                self.namespaces.insert(name.to_string(), namespace.to_string());
                Ok(name.to_string())
            }
        }
    }

    fn declare(&mut self, name: &str) -> &mut ClassDecl {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.classes.push(ClassDecl {
                    name: name.to_string(),
                    parents: Vec::new(),
                    disjoint_with: Vec::new(),
                });
                self.index.insert(name.to_string(), self.classes.len() - 1);
                self.classes.len() - 1
            }
        };
        &mut self.classes[idx]
    }

    fn add_parent(&mut self, class: &str, parent: &str) {
        let decl = self.declare(class);
        if !decl.parents.iter().any(|p| p == parent) {
            decl.parents.push(parent.to_string());
        }
    }

    fn add_disjoint(&mut self, class: &str, other: &str) {
        let decl = self.declare(class);
        if !decl.disjoint_with.iter().any(|d| d == other) {
            decl.disjoint_with.push(other.to_string());
        }
    }

    fn finish(self) -> TaxonomyDocument {
        TaxonomyDocument {
            classes: self.classes,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
