//! Form page and prediction handlers

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use uuid::Uuid;

use student_predictor_core::{PredictionReport, StudentRecord};

use crate::{
    models::{PredictResponse, StudentForm},
    views::{self, Banner},
    AppError, AppResult, AppState, HtmlError,
};

/// GET / - empty form with widget defaults
pub async fn form_page() -> Html<String> {
    Html(views::render_form(&StudentRecord::default(), None))
}

/// POST /predict - form submission, re-renders the form with the result
pub async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<StudentForm>, FormRejection>,
) -> Result<Response, HtmlError> {
    let Form(form) = form.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let record = form.into_record()?;

    let response = match run_prediction(&state, &record) {
        Ok((_, report)) => {
            Html(views::render_form(&record, Some(Banner::Outcome(report.outcome)))).into_response()
        }
        Err(err) => {
            let banner = Banner::Error {
                title: err.title(),
                message: err.message(),
            };
            (err.status(), Html(views::render_form(&record, Some(banner)))).into_response()
        }
    };

    Ok(response)
}

/// POST /api/v1/predict - JSON body with the same field names
pub async fn predict_json(
    State(state): State<AppState>,
    body: Result<Json<StudentForm>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(form) = body.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let record = form.into_record()?;

    let (id, report) = run_prediction(&state, &record)?;
    Ok(Json(PredictResponse::new(id, report)))
}

fn guard(state: &AppState, err: AppError) -> AppError {
    if state.config.is_production() {
        err.redacted()
    } else {
        err
    }
}

fn run_prediction(state: &AppState, record: &StudentRecord) -> AppResult<(Uuid, PredictionReport)> {
    let id = Uuid::new_v4();

    match state.context.predict_record(record) {
        Ok(report) => {
            tracing::info!(
                %id,
                result = %report.outcome,
                probability = ?report.probability,
                inference_time_us = report.inference_time_us,
                "Prediction completed"
            );
            Ok((id, report))
        }
        Err(e) => {
            tracing::warn!(%id, error = %e, "Prediction failed");
            Err(guard(state, AppError::from(e)))
        }
    }
}
