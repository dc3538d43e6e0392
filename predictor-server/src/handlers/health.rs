//! Health check and model status handlers

use axum::{extract::State, Json};
use serde::Serialize;

use student_predictor_core::EngineStatus;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
}

pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Loaded artifacts, layout and prediction counters
pub async fn model_status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.context.status())
}
