//! Static taxonomy and catalog corpora used across harnesses.
//!
//! The game catalog mirrors a small store front: `Horror` with a
//! psychological branch, a diamond (`SurvivalHorror` under both `Horror` and
//! `Survival`) and an unrelated `Racing` tree.

use super::builders::TaxonomyBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tagsift_core::ValidatedTaxonomy;
use tagsift_store::{Triple, TripleStore, Vocabulary};

pub const GAMES_TAXONOMY_JSON: &str = r#"{
  "classes": [
    { "name": "Horror",              "parents": ["Thing"] },
    { "name": "PsychologicalHorror", "parents": ["Horror"] },
    { "name": "CosmicHorror",        "parents": ["PsychologicalHorror"] },
    { "name": "Survival" },
    { "name": "SurvivalHorror",      "parents": ["Horror", "Survival"] },
    { "name": "Comedy",              "disjoint_with": ["Horror"] },
    { "name": "Racing" },
    { "name": "KartRacing",          "parents": ["Racing"] }
  ]
}"#;

pub const GAMES_TAXONOMY_OWL: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns="http://example.org/games#"
     xml:base="http://example.org/games"
     xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
     xmlns:owl="http://www.w3.org/2002/07/owl#"
     xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#">
    <owl:Ontology rdf:about="http://example.org/games"/>
    <owl:Class rdf:about="http://example.org/games#Horror">
        <rdfs:subClassOf rdf:resource="http://www.w3.org/2002/07/owl#Thing"/>
    </owl:Class>
    <owl:Class rdf:about="http://example.org/games#PsychologicalHorror">
        <rdfs:subClassOf rdf:resource="http://example.org/games#Horror"/>
    </owl:Class>
    <owl:Class rdf:about="http://example.org/games#CosmicHorror">
        <rdfs:subClassOf rdf:resource="http://example.org/games#PsychologicalHorror"/>
    </owl:Class>
    <owl:Class rdf:about="http://example.org/games#Survival"/>
    <owl:Class rdf:about="http://example.org/games#SurvivalHorror">
        <rdfs:subClassOf rdf:resource="http://example.org/games#Horror"/>
        <rdfs:subClassOf rdf:resource="http://example.org/games#Survival"/>
    </owl:Class>
    <owl:Class rdf:about="http://example.org/games#Comedy">
        <owl:disjointWith rdf:resource="http://example.org/games#Horror"/>
    </owl:Class>
    <owl:Class rdf:about="http://example.org/games#Racing"/>
    <owl:Class rdf:about="http://example.org/games#KartRacing">
        <rdfs:subClassOf rdf:resource="http://example.org/games#Racing"/>
    </owl:Class>
</rdf:RDF>
"#;

/// Catalog triples: `(id, predicate, value)`.
pub const GAMES_RECORDS_TSV: &str = "\
# id\tpredicate\tvalue
7\ttitle\tSaw
7\ttag\tHorror
42\ttitle\tSoma
42\ttag\tPsychologicalHorror
108\ttitle\tBloodborne
108\ttag\tCosmicHorror
108\ttag\tHorror
230\ttitle\tThe Long Dark
230\ttag\tSurvival
380\ttitle\tResident Evil
380\ttag\tSurvivalHorror
500\ttitle\tMario Kart
500\ttag\tKartRacing
900\ttag\tHorror
";

/// The game taxonomy built in code, identical to [`GAMES_TAXONOMY_JSON`].
pub fn games_taxonomy() -> Arc<ValidatedTaxonomy> {
    games_builder().validated()
}

pub fn games_builder() -> TaxonomyBuilder {
    TaxonomyBuilder::new()
        .class("Horror", &["Thing"])
        .class("PsychologicalHorror", &["Horror"])
        .class("CosmicHorror", &["PsychologicalHorror"])
        .class("Survival", &[])
        .class("SurvivalHorror", &["Horror", "Survival"])
        .class("Comedy", &[])
        .disjoint("Comedy", "Horror")
        .class("Racing", &[])
        .class("KartRacing", &["Racing"])
}

/// [`GAMES_RECORDS_TSV`] as an in-memory triple store.
pub fn games_store() -> TripleStore {
    let triples = tagsift_store::triple::parse_tsv(GAMES_RECORDS_TSV, "fixture")
        .expect("fixture records must parse");
    TripleStore::from_triples(Vocabulary::default(), triples)
}

pub fn triple(subject: &str, predicate: &str, object: &str) -> Triple {
    Triple::new(subject, predicate, object)
}

/// Write `content` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("fixture file must be writable");
    path
}
