use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;
use tracing::info;

use crate::metrics::CACHE_SIZE;
use crate::models::{CacheClearResponse, CacheStatsResponse};
use crate::state::AppState;

pub async fn clear_cache_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let removed = state.service.cache().clear();
    CACHE_SIZE.set(0.0);
    info!(removed, "cache cleared");
    Json(CacheClearResponse {
        message: format!("Cache cleared. Removed {removed} entries"),
    })
}

pub async fn cache_stats_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.service.cache().stats();
    Json(CacheStatsResponse {
        total_entries: stats.total_entries,
        cache_ttl_seconds: stats.ttl_seconds,
        memory_usage_mb: stats.approx_size_bytes as f64 / (1024.0 * 1024.0),
    })
}
