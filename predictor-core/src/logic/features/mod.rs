//! Features Module - Record encoding
//!
//! Turns a StudentRecord into the versioned numeric vector the fitted
//! artifacts expect.

pub mod encoder;
pub mod layout;
pub mod vector;


// Re-export common types
pub use encoder::encode;
pub use layout::{LayoutInfo, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::FeatureVector;
