//! Logic Module - Prediction pipeline
//!
//! - `record` - Raw form input (StudentRecord, categorical enums, field specs)
//! - `features/` - Encoding into the versioned feature vector
//! - `model/` - Scaler, classifier, artifacts, result mapping
//! - `pipeline` - Context object tying the artifacts together

pub mod features;
pub mod model;
pub mod pipeline;
pub mod record;
