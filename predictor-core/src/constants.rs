//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

/// Default classifier artifact, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "logistic_model.json";

/// Default scaler artifact, relative to the working directory
pub const DEFAULT_SCALER_PATH: &str = "scaler.json";

/// Default listen address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8501;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Student Result Predictor";
