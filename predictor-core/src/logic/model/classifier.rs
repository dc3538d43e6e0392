//! Classifier - Pre-trained binary decision functions
//!
//! `Classifier` is the seam between the pipeline and a concrete model. The
//! portable implementation is a logistic regression read from exported
//! coefficients; an ONNX backend lives in `onnx.rs` behind the `onnx` feature.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("X has {actual} features, but {classifier} is expecting {expected} features as input")]
    FeatureCountMismatch {
        classifier: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Input contains a non-finite value at column {index}")]
    NonFiniteInput { index: usize },

    #[error("Inference failed: {0}")]
    Backend(String),
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Raw classifier output for one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub label: i64,
    /// Probability of the positive class, when the model exposes one
    pub probability: Option<f64>,
}

pub trait Classifier: Send + Sync {
    fn kind(&self) -> &'static str;

    /// Fitted input width, if the model declares one
    fn n_features(&self) -> Option<usize>;

    fn predict(&self, features: &[f64]) -> Result<ClassifierOutput, PredictionError>;
}

/// Shared input checks for classifiers with a known width
pub(crate) fn check_input(
    classifier: &'static str,
    expected: Option<usize>,
    features: &[f64],
) -> Result<(), PredictionError> {
    if let Some(expected) = expected {
        if features.len() != expected {
            return Err(PredictionError::FeatureCountMismatch {
                classifier,
                expected,
                actual: features.len(),
            });
        }
    }

    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(PredictionError::NonFiniteInput { index });
    }

    Ok(())
}

// ============================================================================
// LOGISTIC REGRESSION
// ============================================================================

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// Binary logistic regression
///
/// `decision = coefficients · x + intercept`; the second class is chosen
/// when the decision is strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            classes: default_classes(),
        }
    }

    pub fn check(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("coefficients is empty".to_string());
        }
        if self.classes.len() != 2 {
            return Err(format!(
                "expected a binary classifier with 2 classes, got {}",
                self.classes.len()
            ));
        }
        if self.classes[0] == self.classes[1] {
            return Err(format!("classes must be distinct, got {:?}", self.classes));
        }
        if let Some(i) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(format!("coefficient {i} is not finite"));
        }
        if !self.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }
        Ok(())
    }

    /// Panics if `features` and `coefficients` differ in length
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        ArrayView1::from(features).dot(&ArrayView1::from(self.coefficients.as_slice()))
            + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "LogisticRegression"
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict(&self, features: &[f64]) -> Result<ClassifierOutput, PredictionError> {
        check_input(self.kind(), self.n_features(), features)?;

        let decision = self.decision_function(features);
        let label = if decision > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        };

        Ok(ClassifierOutput {
            label,
            probability: Some(sigmoid(decision)),
        })
    }
}

// ============================================================================
// ARTIFACT DOCUMENT
// ============================================================================

/// On-disk classifier document, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
}

impl ClassifierArtifact {
    pub fn check(&self) -> Result<(), String> {
        match self {
            ClassifierArtifact::LogisticRegression(m) => m.check(),
        }
    }

    pub fn into_classifier(self) -> Box<dyn Classifier> {
        match self {
            ClassifierArtifact::LogisticRegression(m) => Box::new(m),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
