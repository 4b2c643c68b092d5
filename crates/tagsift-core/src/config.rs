//! Configuration types for tagsift.
//!
//! [`Config::load`] reads `~/.config/tagsift/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::load_from`] reads an
//! explicit file instead. [`Config::defaults`] returns the built-in defaults
//! without touching the filesystem (useful in tests).

use crate::search::SearchOptions;
use crate::taxonomy::TaxonomySource;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[taxonomy]
path = "taxonomy.owl"

[store]
path              = "records.tsv"
tag_predicate     = "tag"
title_predicate   = "title"
lookup_timeout_ms = 5000

[search]
expand_by_default      = true
max_concurrent_lookups = 8
suggestion_limit       = 5

[server]
bind = "127.0.0.1:7878"

[presentation]
item_url_prefix = ""
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

/// `[taxonomy]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyConfig {
    #[serde(default = "default_taxonomy_path")]
    pub path: PathBuf,
}

fn default_taxonomy_path() -> PathBuf { PathBuf::from("taxonomy.owl") }

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self { path: default_taxonomy_path() }
    }
}

impl TaxonomyConfig {
    pub fn source(&self) -> TaxonomySource {
        TaxonomySource::Path(self.path.clone())
    }
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    #[serde(default = "default_tag_predicate")]
    pub tag_predicate: String,
    #[serde(default = "default_title_predicate")]
    pub title_predicate: String,
    /// Per-lookup bound in milliseconds; `0` disables the timeout.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

fn default_store_path() -> PathBuf { PathBuf::from("records.tsv") }
fn default_tag_predicate() -> String { "tag".to_string() }
fn default_title_predicate() -> String { "title".to_string() }
fn default_lookup_timeout_ms() -> u64 { 5000 }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            tag_predicate: default_tag_predicate(),
            title_predicate: default_title_predicate(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

impl StoreConfig {
    pub fn lookup_timeout(&self) -> Option<Duration> {
        (self.lookup_timeout_ms > 0).then(|| Duration::from_millis(self.lookup_timeout_ms))
    }
}

/// `[search]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_expand_by_default")]
    pub expand_by_default: bool,
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

fn default_expand_by_default() -> bool { true }
fn default_max_concurrent_lookups() -> usize { 8 }
fn default_suggestion_limit() -> usize { 5 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            expand_by_default: default_expand_by_default(),
            max_concurrent_lookups: default_max_concurrent_lookups(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            max_concurrent_lookups: self.max_concurrent_lookups,
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:7878".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// `[presentation]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresentationConfig {
    /// Prepended to an item id to build its link; empty means no link column.
    #[serde(default)]
    pub item_url_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/tagsift/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::layered(&path, false)
    }

    /// Load an explicit config file, layered on top of the built-in defaults.
    /// The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::layered(path, true)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn layered(path: &Path, required: bool) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(required))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("tagsift")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
