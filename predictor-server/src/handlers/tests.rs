//! Router tests against an in-memory prediction context

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use student_predictor_core::logic::model::{LogisticRegression, StandardScaler};
use student_predictor_core::PredictionContext;

use crate::{config::Config, create_router, AppState};

const PASS_FORM: &str = "Gender=Male&Age=18&Parent_Education_Level=Bachelor&Study_Time=5\
&Failures=0&Absences=2&Tutoring=Yes&Test_Preparation_Course=Yes&Previous_Score=85\
&Motivation_Level=8&Stress_Level=3&Final_Grade=16";

const FAIL_FORM: &str = "Gender=Female&Age=21&Parent_Education_Level=Primary&Study_Time=1\
&Failures=5&Absences=50&Tutoring=No&Test_Preparation_Course=No&Previous_Score=10\
&Motivation_Level=1&Stress_Level=10&Final_Grade=2";

fn context_with_width(width: usize) -> PredictionContext {
    let mean = vec![0.5, 18.5, 2.5, 5.5, 1.0, 10.0, 0.5, 0.5, 60.0, 5.5, 5.5, 10.0];
    let scale = vec![0.5, 2.0, 1.5, 3.0, 1.0, 10.0, 0.5, 0.5, 20.0, 3.0, 3.0, 5.0];
    let coefficients = vec![0.0, 0.0, 0.1, 0.5, -0.8, -0.4, 0.3, 0.3, 1.0, 0.4, -0.3, 2.0];

    let scaler = StandardScaler::new(mean[..width].to_vec(), scale[..width].to_vec());
    let classifier = LogisticRegression::new(coefficients[..width].to_vec(), 0.2);
    PredictionContext::new(Box::new(scaler), Box::new(classifier))
}

fn app_with(context: PredictionContext, environment: &str) -> (Router, Arc<PredictionContext>) {
    let mut config = Config::from_lookup(|_| None);
    config.environment = environment.to_string();

    let context = Arc::new(context);
    let state = AppState {
        context: context.clone(),
        config,
    };
    (create_router(state), context)
}

fn app() -> Router {
    app_with(context_with_width(12), "development").0
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn pass_json() -> Value {
    serde_json::json!({
        "Gender": "Male",
        "Age": 18,
        "Parent_Education_Level": "Bachelor",
        "Study_Time": 5,
        "Failures": 0,
        "Absences": 2,
        "Tutoring": "Yes",
        "Test_Preparation_Course": "Yes",
        "Previous_Score": 85,
        "Motivation_Level": 8,
        "Stress_Level": 3,
        "Final_Grade": 16
    })
}

#[tokio::test]
async fn test_form_page_renders_defaults() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = text(response).await;
    assert!(html.contains("Student Result Predictor"));
    assert!(html.contains("<form method=\"post\" action=\"/predict\">"));
    assert!(html.contains("name=\"Final_Grade\""));
    assert!(!html.contains("class=\"banner"));
}

#[tokio::test]
async fn test_form_submission_pass() {
    let response = app().oneshot(form_request(PASS_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = text(response).await;
    assert!(html.contains("banner success"));
    assert!(html.contains("Prediction: PASS. The student is likely to pass!"));
    // Submitted values stay in the form
    assert!(html.contains("value=\"85\""));
}

#[tokio::test]
async fn test_form_submission_fail() {
    let response = app().oneshot(form_request(FAIL_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = text(response).await;
    assert!(html.contains("banner error"));
    assert!(html.contains("Prediction: FAIL. The student might fail. Needs improvement."));
}

#[tokio::test]
async fn test_form_out_of_range_is_rejected() {
    let body = PASS_FORM.replace("Age=18", "Age=40");
    let response = app().oneshot(form_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = text(response).await;
    assert!(html.contains("Invalid input"));
    assert!(html.contains("Age must be between 15 and 22"));
}

#[tokio::test]
async fn test_form_unknown_category_is_rejected() {
    let body = PASS_FORM.replace("Gender=Male", "Gender=Unknown");
    let response = app().oneshot(form_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(text(response).await.contains("Invalid input"));
}

#[tokio::test]
async fn test_json_predict() {
    let response = app().oneshot(json_request(pass_json())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["result"], "PASS");
    assert_eq!(body["label"], 1);
    assert_eq!(body["message"], "Prediction: PASS. The student is likely to pass!");
    assert_eq!(body["encoded"].as_array().unwrap().len(), 12);
    assert_eq!(body["encoded"][8], 85.0);
    assert_eq!(body["scaled"].as_array().unwrap().len(), 12);
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn test_json_validation_error() {
    let mut payload = pass_json();
    payload["Previous_Score"] = Value::from(101);

    let response = app().oneshot(json_request(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json(response).await;
    assert_eq!(body["error"], "Invalid input");
    assert_eq!(body["status"], 422);
}

#[tokio::test]
async fn test_scaler_mismatch_reports_error_and_keeps_serving() {
    let (app, context) = app_with(context_with_width(11), "development");

    let response = app.clone().oneshot(form_request(PASS_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = text(response).await;
    assert!(html.contains("Input scaling error"));
    assert!(html.contains("X has 12 features, but StandardScaler is expecting 11 features as input"));
    // The form is still there to resubmit
    assert!(html.contains("<form method=\"post\" action=\"/predict\">"));

    let response = app.oneshot(json_request(pass_json())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(response).await["error"], "Input scaling error");

    assert_eq!(context.status().failure_count, 2);
    assert_eq!(context.status().prediction_count, 0);
}

#[tokio::test]
async fn test_production_redacts_pipeline_errors() {
    let (app, _) = app_with(context_with_width(11), "production");

    let response = app.oneshot(json_request(pass_json())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json(response).await;
    assert_eq!(body["error"], "Input scaling error");
    assert_eq!(body["message"], "The prediction could not be completed");
}

#[tokio::test]
async fn test_production_keeps_validation_messages() {
    let (app, _) = app_with(context_with_width(12), "production");
    let mut payload = pass_json();
    payload["Age"] = Value::from(14);

    let response = app.oneshot(json_request(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json(response).await["message"]
        .as_str()
        .unwrap()
        .contains("Age must be between 15 and 22"));
}

#[tokio::test]
async fn test_health() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_model_status_counts_predictions() {
    let (app, _) = app_with(context_with_width(12), "development");

    app.clone().oneshot(form_request(PASS_FORM)).await.unwrap();
    app.clone().oneshot(form_request(FAIL_FORM)).await.unwrap();

    let response = app.oneshot(get("/api/v1/model")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["scaler_type"], "StandardScaler");
    assert_eq!(body["classifier_type"], "LogisticRegression");
    assert_eq!(body["prediction_count"], 2);
    assert_eq!(body["failure_count"], 0);
    assert_eq!(body["layout"]["feature_count"], 12);
}
