//! Read-only HTTP endpoint over a shared [`Engine`].
//!
//! ```text
//! GET /search?tag=Horror[&expand=false]     → SearchResponse
//! GET /attribution?tag=Horror               → Attribution
//! GET /descendants?tag=Horror[&direct=true] → DescendantsResponse
//! GET /healthz                              → {"status":"ok","classes":N}
//! ```
//!
//! Boolean parameters accept `true`/`false` and `1`/`0`.
//!
//! A failed literal lookup answers `503`; an empty tag answers `400`.

use crate::app::Engine;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tagsift_core::{config::SearchConfig, SearchError, SearchResults};
use tokio::net::TcpListener;

// ---------------------------------------------------------------------------
// State / wire types
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct ServerState {
    engine: Arc<Engine>,
    expand_by_default: bool,
    suggestion_limit: usize,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    tag: String,
    #[serde(default, deserialize_with = "optional_flag")]
    expand: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct TagParams {
    tag: String,
}

#[derive(Debug, Deserialize)]
struct DescendantsParams {
    tag: String,
    #[serde(default, deserialize_with = "flag")]
    direct: bool,
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(de::Error::invalid_value(
            Unexpected::Str(other),
            &"true, false, 1 or 0",
        )),
    }
}

fn optional_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    flag(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub results: SearchResults,
    /// Whether `tag` is a taxonomy class.
    pub known: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DescendantsResponse {
    pub tag: String,
    pub direct: bool,
    pub known: bool,
    pub descendants: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

enum ApiError {
    BadRequest(String),
    Search(SearchError),
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        Self::Search(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            Self::Search(err) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

fn require_tag(tag: &str) -> Result<&str, ApiError> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(ApiError::BadRequest("tag must not be empty".to_string()));
    }
    Ok(tag)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(engine: Arc<Engine>, search: &SearchConfig) -> Router {
    let state = ServerState {
        engine,
        expand_by_default: search.expand_by_default,
        suggestion_limit: search.suggestion_limit,
    };
    Router::new()
        .route("/search", get(search_handler))
        .route("/attribution", get(attribution_handler))
        .route("/descendants", get(descendants_handler))
        .route("/healthz", get(health_handler))
        .with_state(state)
}

/// Bind `bind` and serve until Ctrl-C.
pub async fn serve(bind: &str, engine: Arc<Engine>, search: &SearchConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "serving tag search");
    axum::serve(listener, router(engine, search))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn search_handler(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let tag = require_tag(&params.tag)?;
    let expand = params.expand.unwrap_or(state.expand_by_default);
    let results = state.engine.search(tag, expand).await?;

    let taxonomy = state.engine.expander().taxonomy();
    let known = taxonomy.contains(tag);
    let suggestions = if known {
        Vec::new()
    } else {
        taxonomy.suggest(tag, state.suggestion_limit)
    };
    Ok(Json(SearchResponse {
        results,
        known,
        suggestions,
    }))
}

async fn attribution_handler(
    State(state): State<ServerState>,
    Query(params): Query<TagParams>,
) -> Result<Response, ApiError> {
    let tag = require_tag(&params.tag)?;
    let attribution = state.engine.attribute(tag).await?;
    Ok(Json(attribution).into_response())
}

async fn descendants_handler(
    State(state): State<ServerState>,
    Query(params): Query<DescendantsParams>,
) -> Result<Json<DescendantsResponse>, ApiError> {
    let tag = require_tag(&params.tag)?;
    let known = state.engine.expander().taxonomy().contains(tag);
    let descendants = state.engine.descendants(tag, params.direct);
    Ok(Json(DescendantsResponse {
        tag: tag.to_string(),
        direct: params.direct,
        known,
        descendants: descendants.into_iter().collect(),
    }))
}

async fn health_handler(State(state): State<ServerState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "classes": state.engine.expander().taxonomy().len(),
    }))
}
