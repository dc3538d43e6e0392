//! Student Result Predictor - Core
//!
//! Encodes a student record, scales it with a fitted scaler and runs a
//! pre-trained binary classifier to predict PASS or FAIL.
//!
//! ```text
//! StudentRecord ──encode──▶ FeatureVector ──scaler──▶ scaled ──classifier──▶ label ──▶ Outcome
//! ```

pub mod constants;
pub mod logic;

pub use logic::features::{encode, FeatureVector, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use logic::model::{
    ArtifactLoadError, ArtifactMetadata, Classifier, ClassifierOutput, FeatureTransform,
    Outcome, PredictionError, ScalingError,
};
pub use logic::pipeline::{EngineStatus, PipelineError, PredictionContext, PredictionReport};
pub use logic::record::{
    EducationLevel, FieldSpec, Gender, ParseCategoryError, StudentRecord, YesNo,
};
