//! Error handling

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use student_predictor_core::PipelineError;
use thiserror::Error;

use crate::views;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Input errors (unknown category, value outside widget range)
    #[error("Invalid input: {0}")]
    ValidationError(String),

    // Per-submission pipeline errors
    #[error("Input scaling error: {0}")]
    ScalingError(String),
    #[error("Prediction error: {0}")]
    PredictionError(String),

    // Generic errors
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ScalingError(_)
            | AppError::PredictionError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "Invalid input",
            AppError::ScalingError(_) => "Input scaling error",
            AppError::PredictionError(_) => "Prediction error",
            AppError::InternalError(_) => "Internal error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::ValidationError(msg)
            | AppError::ScalingError(msg)
            | AppError::PredictionError(msg)
            | AppError::InternalError(msg) => msg,
        }
    }

    /// Same kind, generic message; the detail is logged instead
    pub fn redacted(self) -> Self {
        if matches!(self, AppError::ValidationError(_)) {
            return self;
        }
        tracing::error!("{}", self);
        let generic = "The prediction could not be completed".to_string();
        match self {
            AppError::ScalingError(_) => AppError::ScalingError(generic),
            AppError::PredictionError(_) => AppError::PredictionError(generic),
            other => AppError::InternalError(format!("{} ({})", generic, other.title())),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = Json(json!({
            "error": self.title(),
            "message": self.message(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        // The title already names the stage
        match err {
            PipelineError::Scaling(e) => AppError::ScalingError(e.to_string()),
            PipelineError::Prediction(e) => AppError::PredictionError(e.to_string()),
            PipelineError::UnexpectedLabel(label) => AppError::InternalError(format!(
                "classifier returned label {label}, expected 0 or 1"
            )),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

/// AppError rendered as an error-styled HTML page
#[derive(Debug)]
pub struct HtmlError(pub AppError);

impl From<AppError> for HtmlError {
    fn from(err: AppError) -> Self {
        HtmlError(err)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let page = views::error_page(self.0.title(), self.0.message());
        (status, Html(page)).into_response()
    }
}
