//! Model Module - Scaling and inference
//!
//! Fitted artifacts behind two traits: `FeatureTransform` for the scaler
//! and `Classifier` for the decision function. Easy to swap backends or
//! inject mocks in tests.

pub mod artifacts;
pub mod classifier;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod outcome;
pub mod scaler;


// Re-export common types
pub use artifacts::{
    load_classifier, load_scaler, ArtifactKind, ArtifactLoadError, ArtifactMetadata,
    LoadedClassifier, LoadedScaler,
};
pub use classifier::{
    Classifier, ClassifierArtifact, ClassifierOutput, LogisticRegression, PredictionError,
};
pub use outcome::Outcome;
pub use scaler::{FeatureTransform, MinMaxScaler, ScalerArtifact, ScalingError, StandardScaler};
