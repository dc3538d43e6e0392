//! Configuration module

use std::env;
use std::net::{IpAddr, SocketAddr};

use student_predictor_core::constants::{
    DEFAULT_HOST, DEFAULT_MODEL_PATH, DEFAULT_PORT, DEFAULT_SCALER_PATH,
};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Classifier artifact path
    pub model_path: String,

    /// Scaler artifact path
    pub scaler_path: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),

            model_path: lookup("MODEL_PATH").unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string()),

            scaler_path: lookup("SCALER_PATH").unwrap_or_else(|| DEFAULT_SCALER_PATH.to_string()),

            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Socket address to bind; falls back to all interfaces on a bad host
    pub fn bind_addr(&self) -> SocketAddr {
        let ip = self.host.parse::<IpAddr>().unwrap_or_else(|_| {
            tracing::warn!("Invalid HOST {:?}, listening on {}", self.host, DEFAULT_HOST);
            IpAddr::from([0, 0, 0, 0])
        });
        SocketAddr::new(ip, self.port)
    }
}
