//! Ops Handlers
//!
//! Health and cache statistics endpoints.

use axum::{extract::State, Json};

use crate::api::AppState;
use crate::models::{HealthResponse, StatsResponse};

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();

    Json(StatsResponse::new(
        stats.hits,
        stats.misses,
        stats.expirations,
        stats.total_entries,
    ))
}
