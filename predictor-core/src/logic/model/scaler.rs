//! Scaler Adapter - Pre-fitted feature transforms
//!
//! Parameters come from a fitted scaler exported to JSON. Transforms never
//! refit; they only apply the stored per-column parameters.

use std::cmp::Ordering;

use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::layout::first_name_mismatch;
use crate::logic::features::{FeatureVector, LayoutMismatchError};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalingError {
    #[error("X has {actual} features, but {scaler} is expecting {expected} features as input")]
    ShapeMismatch {
        scaler: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(
        "feature names should match those that were passed during fit: \
         column {index} is {actual:?}, expected {expected:?}"
    )]
    FeatureNamesMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),
}

// ============================================================================
// FEATURE TRANSFORM TRAIT
// ============================================================================

/// A fitted per-column transform
pub trait FeatureTransform: Send + Sync {
    /// Short name for logs and error messages
    fn kind(&self) -> &'static str;

    /// Number of columns the transform was fitted on
    fn n_features(&self) -> usize;

    /// Column names recorded at fit time, if any
    fn feature_names(&self) -> Option<&[String]>;

    /// Apply the transform to values already known to have the right length
    fn transform_values(&self, values: ArrayView1<'_, f64>) -> Array1<f64>;

    /// Check shape and schema, then transform
    fn transform(&self, vector: &FeatureVector) -> Result<Vec<f64>, ScalingError> {
        vector.validate()?;

        if vector.len() != self.n_features() {
            return Err(ScalingError::ShapeMismatch {
                scaler: self.kind(),
                expected: self.n_features(),
                actual: vector.len(),
            });
        }

        if let Some(names) = self.feature_names() {
            if let Some((index, layout_name, fitted_name)) = first_name_mismatch(names) {
                return Err(ScalingError::FeatureNamesMismatch {
                    index,
                    expected: fitted_name,
                    actual: layout_name,
                });
            }
        }

        Ok(self.transform_values(ArrayView1::from(vector.as_slice())).to_vec())
    }
}

// ============================================================================
// STANDARD SCALER
// ============================================================================

fn default_true() -> bool {
    true
}

/// Standardization: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default = "default_true")]
    pub with_mean: bool,
    #[serde(default = "default_true")]
    pub with_std: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            mean,
            scale,
            with_mean: true,
            with_std: true,
            feature_names: None,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub fn check(&self) -> Result<(), String> {
        check_columns(&self.mean, "mean", &self.scale, "scale", self.feature_names.as_deref())
    }
}

impl FeatureTransform for StandardScaler {
    fn kind(&self) -> &'static str {
        "StandardScaler"
    }

    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn transform_values(&self, values: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut out = values.to_owned();
        if self.with_mean {
            out -= &ArrayView1::from(self.mean.as_slice());
        }
        if self.with_std {
            // Constant columns are fitted with scale 0; leave them unscaled
            Zip::from(&mut out)
                .and(&ArrayView1::from(self.scale.as_slice()))
                .for_each(|x, &s| {
                    if s != 0.0 {
                        *x /= s;
                    }
                });
        }
        out
    }
}

// ============================================================================
// MIN-MAX SCALER
// ============================================================================

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Min-max normalization: `x * scale + min`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
    #[serde(default)]
    pub clip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl MinMaxScaler {
    /// Build from the observed column minima and maxima, target range [0, 1]
    pub fn from_data_range(data_min: &[f64], data_max: &[f64]) -> Self {
        let (scale, min) = data_min
            .iter()
            .zip(data_max)
            .map(|(&lo, &hi)| {
                let range = if hi - lo == 0.0 { 1.0 } else { hi - lo };
                let scale = 1.0 / range;
                (scale, -lo * scale)
            })
            .unzip();

        Self {
            min,
            scale,
            feature_range: default_feature_range(),
            clip: false,
            feature_names: None,
        }
    }

    pub fn check(&self) -> Result<(), String> {
        let (lo, hi) = self.feature_range;
        if lo.partial_cmp(&hi) != Some(Ordering::Less) {
            return Err(format!("feature_range ({lo}, {hi}) must be increasing"));
        }
        check_columns(&self.min, "min", &self.scale, "scale", self.feature_names.as_deref())
    }
}

impl FeatureTransform for MinMaxScaler {
    fn kind(&self) -> &'static str {
        "MinMaxScaler"
    }

    fn n_features(&self) -> usize {
        self.min.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn transform_values(&self, values: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut out = &values * &ArrayView1::from(self.scale.as_slice());
        out += &ArrayView1::from(self.min.as_slice());
        if self.clip {
            let (lo, hi) = self.feature_range;
            out.mapv_inplace(|x| x.clamp(lo, hi));
        }
        out
    }
}

// ============================================================================
// ARTIFACT DOCUMENT
// ============================================================================

/// On-disk scaler document, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl ScalerArtifact {
    pub fn check(&self) -> Result<(), String> {
        match self {
            ScalerArtifact::Standard(s) => s.check(),
            ScalerArtifact::MinMax(s) => s.check(),
        }
    }

    pub fn into_transform(self) -> Box<dyn FeatureTransform> {
        match self {
            ScalerArtifact::Standard(s) => Box::new(s),
            ScalerArtifact::MinMax(s) => Box::new(s),
        }
    }
}

fn check_columns(
    a: &[f64],
    a_name: &str,
    b: &[f64],
    b_name: &str,
    names: Option<&[String]>,
) -> Result<(), String> {
    if a.is_empty() {
        return Err(format!("{a_name} is empty"));
    }
    if a.len() != b.len() {
        return Err(format!(
            "{a_name} has {} columns but {b_name} has {}",
            a.len(),
            b.len()
        ));
    }
    if let Some(names) = names {
        if names.len() != a.len() {
            return Err(format!(
                "feature_names has {} entries but {a_name} has {} columns",
                names.len(),
                a.len()
            ));
        }
    }
    if let Some(i) = a.iter().chain(b).position(|v| !v.is_finite()) {
        return Err(format!("non-finite parameter at position {i}"));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
