//! Engine assembly from configuration.
//!
//! Loading and validating the taxonomy happens exactly once here; the
//! resulting engine is shared by every query the process serves.

use anyhow::Context;
use std::sync::Arc;
use tagsift_core::{
    config::Config, ConsistencyChecker, ConsistencyReport, RecordStore, SearchEngine, Taxonomy,
    ValidatedTaxonomy,
};
use tagsift_store::{TimeoutStore, TripleStore, Vocabulary};

/// The engine type served by the CLI and the HTTP endpoint.
pub type Engine = SearchEngine<Arc<dyn RecordStore>>;

/// Load the configured taxonomy without validating it.
pub fn load_taxonomy(config: &Config) -> anyhow::Result<Taxonomy> {
    let source = config.taxonomy.source();
    Taxonomy::load(&source)
        .with_context(|| format!("loading taxonomy from {}", config.taxonomy.path.display()))
}

/// Load and validate the configured taxonomy. An inconsistent taxonomy is an
/// error naming every unsatisfiable class.
pub fn load_validated_taxonomy(config: &Config) -> anyhow::Result<Arc<ValidatedTaxonomy>> {
    let taxonomy = load_taxonomy(config)?;
    let validated = ConsistencyChecker::validate(taxonomy)?;
    Ok(Arc::new(validated))
}

/// Load and check the configured taxonomy, returning the report instead of
/// failing on inconsistency.
pub fn check_taxonomy(config: &Config) -> anyhow::Result<ConsistencyReport> {
    let taxonomy = load_taxonomy(config)?;
    Ok(ConsistencyChecker::check(&taxonomy))
}

/// Open the configured record store, wrapped in a timeout when one is set.
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let vocabulary = Vocabulary {
        tag: config.store.tag_predicate.clone(),
        title: config.store.title_predicate.clone(),
    };
    let store = TripleStore::load(&config.store.path, vocabulary)
        .await
        .with_context(|| format!("opening record store {}", config.store.path.display()))?;

    Ok(match config.store.lookup_timeout() {
        Some(timeout) => Arc::new(TimeoutStore::new(store, timeout)),
        None => Arc::new(store),
    })
}

/// Assemble a ready engine: validated taxonomy + record store + search options.
pub async fn build_engine(config: &Config) -> anyhow::Result<Engine> {
    let taxonomy = load_validated_taxonomy(config)?;
    let store = open_store(config).await?;
    Ok(SearchEngine::new(taxonomy, store).with_options(config.search.options()))
}
