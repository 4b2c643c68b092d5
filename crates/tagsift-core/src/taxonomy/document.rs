//! Authoring-level taxonomy document: the plain list of class declarations a
//! source format decodes into before [`Taxonomy`](super::Taxonomy) resolves
//! names into edges.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};

/// A decoded but unresolved taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyDocument {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

/// One class declaration. Parent and disjointness references are names, not
/// yet checked against the rest of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub disjoint_with: Vec<String>,
}

impl TaxonomyDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the JSON document format:
    ///
    /// ```json
    /// { "classes": [ { "name": "PsychologicalHorror", "parents": ["Horror"] } ] }
    /// ```
    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Append a class with the given parents.
    pub fn with_class(mut self, name: &str, parents: &[&str]) -> Self {
        self.classes.push(ClassDecl {
            name: name.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            disjoint_with: Vec::new(),
        });
        self
    }

    /// Declare `a` and `b` disjoint. `a` must already be declared in this
    /// document; `b` is resolved at load time like any other reference.
    pub fn with_disjoint(mut self, a: &str, b: &str) -> Self {
        if let Some(decl) = self.classes.iter_mut().find(|c| c.name == a) {
            decl.disjoint_with.push(b.to_string());
        }
        self
    }
}
