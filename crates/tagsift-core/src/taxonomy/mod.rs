//! Taxonomy: the in-memory tag hierarchy.
//!
//! A [`Taxonomy`] is an arena of [`TagClass`] nodes addressed by [`TagId`],
//! with a name → id hash index for O(1) exact lookups and an `fst::Set` over
//! the same names for prefix suggestions. Parent edges are authoritative;
//! child edges are the inverse index computed once at load time.
//!
//! Names are opaque, case-sensitive identifiers. A taxonomy is immutable once
//! built; share it behind an `Arc` after validation (see
//! [`ConsistencyChecker`](crate::ConsistencyChecker)).

pub mod document;
pub mod owl;

pub use document::{ClassDecl, TaxonomyDocument};

use crate::error::{LoadError, NotFound, ReasoningError};
use fst::{automaton::Str, Automaton, IntoStreamer, Streamer};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Built-in classes
// ---------------------------------------------------------------------------

/// Universal top classes: everything is one, so they are never useful search
/// terms. A parent reference to one of these marks a root.
static TOP_CLASSES: phf::Set<&'static str> = phf::phf_set! {
    "Thing",
    "owl:Thing",
    "http://www.w3.org/2002/07/owl#Thing",
};

/// Bottom classes: nothing is one. A class declared beneath one of these is
/// unsatisfiable.
static BOTTOM_CLASSES: phf::Set<&'static str> = phf::phf_set! {
    "Nothing",
    "owl:Nothing",
    "http://www.w3.org/2002/07/owl#Nothing",
};

/// `true` for names reserved for the structural top and bottom classes.
pub fn is_built_in(name: &str) -> bool {
    TOP_CLASSES.contains(name) || BOTTOM_CLASSES.contains(name)
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Where a taxonomy comes from. Always passed explicitly to [`Taxonomy::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomySource {
    /// A file whose extension selects the format: `.json`, or `.owl` / `.rdf` /
    /// `.xml` for RDF/XML.
    Path(PathBuf),
    /// An in-memory JSON document.
    Json(String),
    /// An in-memory OWL RDF/XML document.
    OwlXml(String),
}

impl TaxonomySource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        TaxonomySource::Path(path.into())
    }
}

// ---------------------------------------------------------------------------
// TagClass
// ---------------------------------------------------------------------------

/// Index of a class within its [`Taxonomy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u32);

impl TagId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        TagId(index as u32)
    }
}

/// A uniquely named node of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagClass {
    name: String,
    parents: Vec<TagId>,
    children: Vec<TagId>,
    disjoint_with: Vec<TagId>,
    declared_empty: bool,
}

impl TagClass {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct superclasses. Empty for a root.
    pub fn parents(&self) -> &[TagId] {
        &self.parents
    }

    /// Direct subclasses (derived inverse of `parents`).
    pub fn children(&self) -> &[TagId] {
        &self.children
    }

    /// Classes declared disjoint with this one, in either direction.
    pub fn disjoint_with(&self) -> &[TagId] {
        &self.disjoint_with
    }

    /// `true` if the class was declared a subclass of a bottom class.
    pub fn declared_empty(&self) -> bool {
        self.declared_empty
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// The full set of classes plus their name indexes.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    classes: Vec<TagClass>,
    index: HashMap<String, TagId>,
    names: fst::Set<Vec<u8>>,
}

impl Taxonomy {
    /// Read and resolve a taxonomy from `source`.
    pub fn load(source: &TaxonomySource) -> Result<Self, LoadError> {
        let doc = match source {
            TaxonomySource::Json(content) => TaxonomyDocument::from_json(content)?,
            TaxonomySource::OwlXml(content) => owl::parse_owl_xml(content)?,
            TaxonomySource::Path(path) => read_document(path)?,
        };
        let taxonomy = Self::from_document(doc)?;
        tracing::info!(
            classes = taxonomy.len(),
            roots = taxonomy.roots().count(),
            "taxonomy loaded"
        );
        Ok(taxonomy)
    }

    /// Resolve a decoded document into nodes and edges.
    ///
    /// Fails on empty, reserved or duplicate names and on any reference to a
    /// name the document does not declare. Cycles are *not* rejected here;
    /// that is the consistency checker's job.
    pub fn from_document(doc: TaxonomyDocument) -> Result<Self, LoadError> {
        let mut index = HashMap::with_capacity(doc.classes.len());
        for (i, decl) in doc.classes.iter().enumerate() {
            if decl.name.is_empty() {
                return Err(LoadError::EmptyName);
            }
            if is_built_in(&decl.name) {
                return Err(LoadError::ReservedName(decl.name.clone()));
            }
            if index.insert(decl.name.clone(), TagId::from_index(i)).is_some() {
                return Err(LoadError::DuplicateName(decl.name.clone()));
            }
        }

        let resolve = |class: &str, name: &str| -> Result<TagId, LoadError> {
            index
                .get(name)
                .copied()
                .ok_or_else(|| LoadError::DanglingReference {
                    class: class.to_string(),
                    missing: name.to_string(),
                })
        };

        let mut classes: Vec<TagClass> = Vec::with_capacity(doc.classes.len());
        let mut disjoint_pairs = Vec::new();
        for decl in &doc.classes {
            let mut parents = Vec::with_capacity(decl.parents.len());
            let mut declared_empty = false;
            for parent in &decl.parents {
                if TOP_CLASSES.contains(parent.as_str()) {
                    continue;
                }
                if BOTTOM_CLASSES.contains(parent.as_str()) {
                    declared_empty = true;
                    continue;
                }
                let id = resolve(&decl.name, parent)?;
                if !parents.contains(&id) {
                    parents.push(id);
                }
            }
            let this = TagId::from_index(classes.len());
            for other in &decl.disjoint_with {
                if is_built_in(other) {
                    return Err(LoadError::ReservedName(other.clone()));
                }
                disjoint_pairs.push((this, resolve(&decl.name, other)?));
            }
            classes.push(TagClass {
                name: decl.name.clone(),
                parents,
                children: Vec::new(),
                disjoint_with: Vec::new(),
                declared_empty,
            });
        }

        for i in 0..classes.len() {
            for p in classes[i].parents.clone() {
                classes[p.index()].children.push(TagId::from_index(i));
            }
        }
        for (a, b) in disjoint_pairs {
            for (x, y) in [(a, b), (b, a)] {
                let list = &mut classes[x.index()].disjoint_with;
                if !list.contains(&y) {
                    list.push(y);
                }
            }
        }

        let sorted: BTreeSet<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        let names = fst::Set::from_iter(sorted)?;

        Ok(Self {
            classes,
            index,
            names,
        })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Exact, case-sensitive existence check.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Result<&TagClass, NotFound> {
        self.id_of(name)
            .and_then(|id| self.class(id))
            .ok_or_else(|| NotFound(name.to_string()))
    }

    pub fn id_of(&self, name: &str) -> Option<TagId> {
        self.index.get(name).copied()
    }

    pub fn class(&self, id: TagId) -> Option<&TagClass> {
        self.classes.get(id.index())
    }

    /// All classes with their ids, in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = (TagId, &TagClass)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (TagId::from_index(i), c))
    }

    /// Classes without parents.
    pub fn roots(&self) -> impl Iterator<Item = &TagClass> {
        self.classes.iter().filter(|c| c.is_root())
    }

    /// Every class name in lexical byte order.
    pub fn names(&self) -> Vec<String> {
        self.collect_names(self.names.stream(), usize::MAX)
    }

    /// Up to `limit` class names beginning with `prefix`, in lexical order.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        let matcher = Str::new(prefix).starts_with();
        self.collect_names(self.names.search(matcher).into_stream(), limit)
    }

    fn collect_names<S>(&self, mut stream: S, limit: usize) -> Vec<String>
    where
        S: for<'a> Streamer<'a, Item = &'a [u8]>,
    {
        let mut out = Vec::new();
        while out.len() < limit {
            match stream.next() {
                Some(key) => out.push(String::from_utf8_lossy(key).into_owned()),
                None => break,
            }
        }
        out
    }

    /// Descendant names of `name`: immediate children when `direct`, the full
    /// transitive closure otherwise. Unknown names have no descendants.
    ///
    /// This is the raw traversal; use
    /// [`SubsumptionExpander`](crate::SubsumptionExpander) on a validated
    /// taxonomy to get the logged, best-effort variant.
    pub fn all_descendants(
        &self,
        name: &str,
        direct: bool,
    ) -> Result<BTreeSet<String>, ReasoningError> {
        match self.id_of(name) {
            Some(id) => crate::expand::descendant_closure(self, id, direct),
            None => Ok(BTreeSet::new()),
        }
    }
}

fn read_document(path: &Path) -> Result<TaxonomyDocument, LoadError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !matches!(ext.as_str(), "json" | "owl" | "rdf" | "xml") {
        return Err(LoadError::UnsupportedFormat(ext));
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "reading taxonomy document");

    match ext.as_str() {
        "json" => TaxonomyDocument::from_json(&content),
        _ => owl::parse_owl_xml(&content),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
