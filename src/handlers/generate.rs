use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::{ErrorBody, StoryRequest};
use crate::service::HandleError;
use crate::state::AppState;

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StoryRequest>,
) -> impl IntoResponse {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let result = state.service.handle(&payload, chrono::Utc::now()).await;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(HandleError::Validation(err)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: err.to_string(),
                field: Some(err.field().to_string()),
            }),
        )
            .into_response(),
        Err(HandleError::Generation(err)) => {
            // upstream detail stays in the logs
            error!(%err, "storyline generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Failed to generate storyline.".to_string(),
                    field: None,
                }),
            )
                .into_response()
        }
    }
}
