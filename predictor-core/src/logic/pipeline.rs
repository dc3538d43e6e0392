//! Prediction Pipeline - encode → scale → predict → map
//!
//! `PredictionContext` owns the loaded artifacts. It is built once and
//! passed to whoever serves requests; nothing here is global.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::features::{encode, FeatureVector, LayoutInfo, FEATURE_COUNT};
use super::model::{
    load_classifier, load_scaler, ArtifactLoadError, ArtifactMetadata, Classifier,
    FeatureTransform, LoadedClassifier, LoadedScaler, Outcome, PredictionError, ScalingError,
};
use super::record::StudentRecord;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Per-submission failure; the context stays usable
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("Input scaling error: {0}")]
    Scaling(#[from] ScalingError),

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),

    #[error("Internal error: classifier returned label {0}, expected 0 or 1")]
    UnexpectedLabel(i64),
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub outcome: Outcome,
    pub label: i64,
    /// Probability of PASS, when the classifier exposes one
    pub probability: Option<f64>,
    pub encoded: Vec<f64>,
    pub scaled: Vec<f64>,
    pub inference_time_us: u64,
}

/// Engine Status for the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub scaler_type: String,
    pub classifier_type: String,
    pub scaler: Option<ArtifactMetadata>,
    pub classifier: Option<ArtifactMetadata>,
    pub layout: LayoutInfo,
    pub prediction_count: u64,
    pub failure_count: u64,
    pub avg_latency_ms: f32,
}

// ============================================================================
// CONTEXT
// ============================================================================

pub struct PredictionContext {
    scaler: Box<dyn FeatureTransform>,
    classifier: Box<dyn Classifier>,
    scaler_metadata: Option<ArtifactMetadata>,
    classifier_metadata: Option<ArtifactMetadata>,

    latency_sum_us: AtomicU64,
    prediction_count: AtomicU64,
    failure_count: AtomicU64,
}

impl PredictionContext {
    /// Build from in-memory artifacts
    pub fn new(scaler: Box<dyn FeatureTransform>, classifier: Box<dyn Classifier>) -> Self {
        Self {
            scaler,
            classifier,
            scaler_metadata: None,
            classifier_metadata: None,
            latency_sum_us: AtomicU64::new(0),
            prediction_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
        }
    }

    pub fn from_loaded(scaler: LoadedScaler, classifier: LoadedClassifier) -> Self {
        let mut context = Self::new(scaler.transform, classifier.classifier);
        context.scaler_metadata = Some(scaler.metadata);
        context.classifier_metadata = Some(classifier.metadata);
        context
    }

    /// Load both artifacts from disk, classifier first
    pub fn load(
        model_path: impl AsRef<Path>,
        scaler_path: impl AsRef<Path>,
    ) -> Result<Self, ArtifactLoadError> {
        let classifier = load_classifier(model_path)?;
        let scaler = load_scaler(scaler_path)?;
        let context = Self::from_loaded(scaler, classifier);

        for warning in context.compatibility_warnings() {
            log::warn!("{}", warning);
        }

        Ok(context)
    }

    /// Width disagreements between the layout and the artifacts
    ///
    /// Not fatal: each submission reports them as scaling/prediction errors.
    pub fn compatibility_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let scaler_width = self.scaler.n_features();

        if scaler_width != FEATURE_COUNT {
            warnings.push(format!(
                "{} was fitted on {} features, the form produces {}",
                self.scaler.kind(),
                scaler_width,
                FEATURE_COUNT
            ));
        }
        if let Some(width) = self.classifier.n_features() {
            if width != scaler_width {
                warnings.push(format!(
                    "{} expects {} features, {} produces {}",
                    self.classifier.kind(),
                    width,
                    self.scaler.kind(),
                    scaler_width
                ));
            }
        }

        warnings
    }

    pub fn predict_record(&self, record: &StudentRecord) -> Result<PredictionReport, PipelineError> {
        self.predict_vector(encode(record))
    }

    /// Scale and classify an already encoded vector
    pub fn predict_vector(&self, vector: FeatureVector) -> Result<PredictionReport, PipelineError> {
        let start_time = Instant::now();

        let result = self.run(vector, start_time);

        match &result {
            Ok(report) => {
                self.latency_sum_us.fetch_add(report.inference_time_us, Ordering::Relaxed);
                self.prediction_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                log::debug!("Pipeline failed: {}", e);
            }
        }

        result
    }

    fn run(&self, vector: FeatureVector, start_time: Instant) -> Result<PredictionReport, PipelineError> {
        let scaled = self.scaler.transform(&vector)?;
        let output = self.classifier.predict(&scaled)?;
        let outcome = Outcome::from_label(output.label).map_err(PipelineError::UnexpectedLabel)?;

        Ok(PredictionReport {
            outcome,
            label: output.label,
            probability: output.probability,
            encoded: vector.values,
            scaled,
            inference_time_us: start_time.elapsed().as_micros() as u64,
        })
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.prediction_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            scaler_type: self.scaler.kind().to_string(),
            classifier_type: self.classifier.kind().to_string(),
            scaler: self.scaler_metadata.clone(),
            classifier: self.classifier_metadata.clone(),
            layout: LayoutInfo::current(),
            prediction_count: count,
            failure_count: self.failure_count.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::{ClassifierOutput, LogisticRegression, StandardScaler};
    use crate::logic::record::{EducationLevel, Gender, YesNo};
    use std::sync::Arc;

    /// Classifier returning a fixed label and counting calls
    struct FixedClassifier {
        label: i64,
        calls: Arc<AtomicU64>,
    }

    impl Classifier for FixedClassifier {
        fn kind(&self) -> &'static str {
            "FixedClassifier"
        }

        fn n_features(&self) -> Option<usize> {
            None
        }

        fn predict(&self, _features: &[f64]) -> Result<ClassifierOutput, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ClassifierOutput { label: self.label, probability: None })
        }
    }

    fn identity_scaler() -> Box<dyn FeatureTransform> {
        Box::new(StandardScaler::new(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT]))
    }

    fn fixed(label: i64) -> (PredictionContext, Arc<AtomicU64>) {
        let calls = Arc::new(AtomicU64::new(0));
        let classifier = FixedClassifier { label, calls: calls.clone() };
        (PredictionContext::new(identity_scaler(), Box::new(classifier)), calls)
    }

    fn reference_record() -> StudentRecord {
        StudentRecord {
            gender: Gender::Male,
            age: 18,
            parent_education_level: EducationLevel::Bachelor,
            study_time: 5,
            failures: 0,
            absences: 2,
            tutoring: YesNo::Yes,
            test_preparation_course: YesNo::Yes,
            previous_score: 85,
            motivation_level: 8,
            stress_level: 3,
            final_grade: 16,
        }
    }

    fn reference_context() -> PredictionContext {
        let scaler = StandardScaler::new(
            vec![0.5, 18.5, 2.5, 5.5, 1.0, 10.0, 0.5, 0.5, 60.0, 5.5, 5.5, 10.0],
            vec![0.5, 2.0, 1.5, 3.0, 1.0, 10.0, 0.5, 0.5, 20.0, 3.0, 3.0, 5.0],
        );
        let classifier = LogisticRegression::new(
            vec![0.0, 0.0, 0.1, 0.5, -0.8, -0.4, 0.3, 0.3, 1.0, 0.4, -0.3, 2.0],
            0.2,
        );
        PredictionContext::new(Box::new(scaler), Box::new(classifier))
    }

    #[test]
    fn test_labels_map_to_outcomes() {
        let (context, _) = fixed(1);
        assert_eq!(context.predict_record(&reference_record()).unwrap().outcome, Outcome::Pass);

        let (context, _) = fixed(0);
        assert_eq!(context.predict_record(&reference_record()).unwrap().outcome, Outcome::Fail);
    }

    #[test]
    fn test_unexpected_label_is_internal_error() {
        let (context, _) = fixed(2);
        let err = context.predict_record(&reference_record()).unwrap_err();
        assert_eq!(err, PipelineError::UnexpectedLabel(2));
        assert!(err.to_string().starts_with("Internal error"));
    }

    #[test]
    fn test_short_vector_fails_scaling_without_predicting() {
        let (context, calls) = fixed(1);
        let vector = FeatureVector::from_vec(vec![0.0, 18.0, 3.0, 5.0, 0.0, 2.0, 1.0, 1.0, 85.0, 8.0, 3.0]);

        let err = context.predict_vector(vector).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Scaling(ScalingError::ShapeMismatch { expected: 12, actual: 11, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // The context keeps serving after a failed submission
        assert!(context.predict_record(&reference_record()).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reference_record_is_reproducible() {
        let context = reference_context();
        let first = context.predict_record(&reference_record()).unwrap();

        assert_eq!(
            first.encoded,
            vec![0.0, 18.0, 3.0, 5.0, 0.0, 2.0, 1.0, 1.0, 85.0, 8.0, 3.0, 16.0]
        );
        assert_eq!(first.outcome, Outcome::Pass);

        let again = reference_context().predict_record(&reference_record()).unwrap();
        assert_eq!(again.label, first.label);
        assert_eq!(again.probability, first.probability);
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&again.scaled), bits(&first.scaled));
    }

    #[test]
    fn test_weak_record_fails() {
        let record = StudentRecord {
            study_time: 1,
            failures: 5,
            absences: 50,
            previous_score: 10,
            final_grade: 2,
            ..reference_record()
        };
        let report = reference_context().predict_record(&record).unwrap();
        assert_eq!(report.outcome, Outcome::Fail);
        assert!(report.probability.unwrap() < 0.5);
    }

    #[test]
    fn test_classifier_width_mismatch_is_prediction_error() {
        let classifier = LogisticRegression::new(vec![1.0; 11], 0.0);
        let context = PredictionContext::new(identity_scaler(), Box::new(classifier));

        assert_eq!(context.compatibility_warnings().len(), 1);
        let err = context.predict_record(&reference_record()).unwrap_err();
        assert!(matches!(err, PipelineError::Prediction(_)));
    }

    #[test]
    fn test_matching_artifacts_have_no_warnings() {
        assert!(reference_context().compatibility_warnings().is_empty());
    }

    #[test]
    fn test_status_counters() {
        let (context, _) = fixed(1);
        context.predict_record(&reference_record()).unwrap();
        context.predict_record(&reference_record()).unwrap();
        let _ = context.predict_vector(FeatureVector::from_vec(vec![]));

        let status = context.status();
        assert_eq!(status.prediction_count, 2);
        assert_eq!(status.failure_count, 1);
        assert_eq!(status.scaler_type, "StandardScaler");
        assert_eq!(status.classifier_type, "FixedClassifier");
        assert_eq!(status.layout.feature_count, FEATURE_COUNT);
        assert!(status.scaler.is_none());
    }

    #[test]
    fn test_load_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("logistic_model.json");
        let scaler = dir.path().join("scaler.json");

        let err = PredictionContext::load(&model, &scaler).err().unwrap();
        assert!(matches!(
            err,
            ArtifactLoadError::NotFound { kind: crate::logic::model::ArtifactKind::Classifier, .. }
        ));

        std::fs::write(
            &model,
            r#"{"kind": "logistic_regression", "coefficients": [1,1,1,1,1,1,1,1,1,1,1,1], "intercept": 0}"#,
        )
        .unwrap();
        let err = PredictionContext::load(&model, &scaler).err().unwrap();
        assert!(matches!(
            err,
            ArtifactLoadError::NotFound { kind: crate::logic::model::ArtifactKind::Scaler, .. }
        ));
    }

    #[test]
    fn test_load_from_disk_records_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("logistic_model.json");
        let scaler = dir.path().join("scaler.json");
        std::fs::write(
            &model,
            r#"{"kind": "logistic_regression", "coefficients": [0,0,0,0,0,0,0,0,1,0,0,0], "intercept": 0}"#,
        )
        .unwrap();
        std::fs::write(
            &scaler,
            r#"{"kind": "standard", "mean": [0,0,0,0,0,0,0,0,50,0,0,0], "scale": [1,1,1,1,1,1,1,1,10,1,1,1]}"#,
        )
        .unwrap();

        let context = PredictionContext::load(&model, &scaler).unwrap();
        assert!(context.compatibility_warnings().is_empty());

        let status = context.status();
        assert_eq!(status.scaler.as_ref().unwrap().sha256.len(), 64);
        assert_eq!(status.classifier.as_ref().unwrap().n_features, Some(12));

        // Previous_Score 85 scales to +3.5
        let report = context.predict_record(&reference_record()).unwrap();
        assert_eq!(report.outcome, Outcome::Pass);
        assert_eq!(report.scaled[8], 3.5);
    }
}
