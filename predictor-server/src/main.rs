//! Student Result Predictor Server
//!
//! Serves the student form and runs each submission through the prediction
//! pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                  STUDENT RESULT PREDICTOR                     │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌───────────┐   ┌──────────┐   ┌──────────┐  │
//! │  │  Form /   │──▶│  Encoder  │──▶│  Scaler  │──▶│Classifier│  │
//! │  │  JSON API │   │           │   │          │   │          │  │
//! │  └─────▲─────┘   └───────────┘   └──────────┘   └────┬─────┘  │
//! │        └────────────────  PASS / FAIL  ◀──────────────┘       │
//! └───────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod views;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use student_predictor_core::{constants, PredictionContext};

pub use error::{AppError, AppResult, HtmlError};

// One submission at a time, in arrival order
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging; JSON lines in production
    let json_logs = config.is_production();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "student_predictor_server=debug,student_predictor_core=info,tower_http=debug"
                    .into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("{} v{} starting...", constants::APP_NAME, constants::APP_VERSION);
    tracing::info!("Environment: {}", config.environment);

    // Load artifacts once; the process does not serve without them
    let context = PredictionContext::load(&config.model_path, &config.scaler_path)
        .map_err(|e| {
            tracing::error!("Model or Scaler not loaded: {}", e);
            e
        })
        .context("Model or Scaler not loaded")?;

    let state = AppState {
        context: Arc::new(context),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = config.bind_addr();
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<PredictionContext>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Form pages
    let form_routes = Router::new()
        .route("/", get(handlers::predict::form_page))
        .route("/predict", post(handlers::predict::submit_form));

    // JSON API
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::predict::predict_json))
        .route("/api/v1/model", get(handlers::health::model_status));

    Router::new()
        .merge(form_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
