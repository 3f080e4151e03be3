use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use domain_scout_lib::{CacheStats, DomainResult};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DomainParams {
    pub domain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<DomainResult>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: Vec<DomainResult>,
}

#[derive(Debug, Serialize)]
pub struct CacheClearedResponse {
    pub cleared: usize,
}

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing_param(name))
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// `GET /api/search?query=`: status-verified suggestions.
#[instrument(skip(state), name = "api_search")]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let query = required(params.query, "query")?;
    let results = state.service.search(&query).await?;
    info!(results = results.len(), "search served");
    Ok(Json(ResultsResponse { results }))
}

/// `GET /api/status?domain=`: a single uncached status lookup.
#[instrument(skip(state), name = "api_status")]
pub async fn status(
    State(state): State<AppState>,
    Query(params): Query<DomainParams>,
) -> Result<Json<StatusResponse>, ApiError> {
    let domain = required(params.domain, "domain")?;
    let result = state.service.status(&domain).await?;
    Ok(Json(StatusResponse {
        status: vec![result],
    }))
}

/// `GET /api/expand?query=`: candidate checks with expansion merged on top.
#[instrument(skip(state), name = "api_expand")]
pub async fn expand(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let query = required(params.query, "query")?;
    let checked = state.service.check_candidates(&query).await?;
    let results = state.service.expand(&query, &checked).await?;
    info!(checked = checked.len(), results = results.len(), "expand served");
    Ok(Json(ResultsResponse { results }))
}

pub async fn cache_stats(State(state): State<AppState>) -> Result<Json<CacheStats>, ApiError> {
    let cache = state
        .service
        .cache()
        .lock()
        .map_err(|_| ApiError::internal("cache lock poisoned"))?;
    Ok(Json(cache.stats()))
}

pub async fn clear_cache(
    State(state): State<AppState>,
) -> Result<Json<CacheClearedResponse>, ApiError> {
    let mut cache = state
        .service
        .cache()
        .lock()
        .map_err(|_| ApiError::internal("cache lock poisoned"))?;
    let cleared = cache.size();
    cache.clear();
    info!(cleared, "cache cleared");
    Ok(Json(CacheClearedResponse { cleared }))
}
