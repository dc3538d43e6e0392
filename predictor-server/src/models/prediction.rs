//! Prediction response model

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use student_predictor_core::{Outcome, PredictionReport};

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub id: Uuid,
    pub result: Outcome,
    pub message: &'static str,
    pub label: i64,
    pub probability: Option<f64>,
    pub encoded: Vec<f64>,
    pub scaled: Vec<f64>,
    pub inference_time_us: u64,
    pub timestamp: DateTime<Utc>,
}

impl PredictResponse {
    pub fn new(id: Uuid, report: PredictionReport) -> Self {
        Self {
            id,
            result: report.outcome,
            message: report.outcome.message(),
            label: report.label,
            probability: report.probability,
            encoded: report.encoded,
            scaled: report.scaled,
            inference_time_us: report.inference_time_us,
            timestamp: Utc::now(),
        }
    }
}
