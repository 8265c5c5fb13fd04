use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use crate::models::HealthResponse;
use crate::state::AppState;

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cache_size: state.service.cache().len(),
    })
}
