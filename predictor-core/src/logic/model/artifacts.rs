//! Artifact Loader - Fitted scaler and classifier from disk
//!
//! Loaded once at startup. Any failure here is fatal for the process.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::classifier::{Classifier, ClassifierArtifact};
use super::scaler::{FeatureTransform, ScalerArtifact};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Classifier,
    Scaler,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Classifier => f.write_str("classifier"),
            ArtifactKind::Scaler => f.write_str("scaler"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("{kind} artifact not found: {path}")]
    NotFound { kind: ArtifactKind, path: String },

    #[error("failed to read {kind} artifact {path}: {source}")]
    Io {
        kind: ArtifactKind,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} artifact {path} is not a valid document: {source}")]
    Parse {
        kind: ArtifactKind,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} artifact {path} is inconsistent: {reason}")]
    Invalid {
        kind: ArtifactKind,
        path: String,
        reason: String,
    },

    #[error("unsupported {kind} artifact format for {path}: {reason}")]
    UnsupportedFormat {
        kind: ArtifactKind,
        path: String,
        reason: String,
    },
}

// ============================================================================
// METADATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub kind: ArtifactKind,
    pub path: String,
    /// e.g. "StandardScaler", "LogisticRegression"
    pub model_type: String,
    pub sha256: String,
    pub size_bytes: u64,
    pub n_features: Option<usize>,
    pub loaded_at: DateTime<Utc>,
}

pub struct LoadedScaler {
    pub transform: Box<dyn FeatureTransform>,
    pub metadata: ArtifactMetadata,
}

pub struct LoadedClassifier {
    pub classifier: Box<dyn Classifier>,
    pub metadata: ArtifactMetadata,
}

// ============================================================================
// LOADING
// ============================================================================

fn read_artifact(kind: ArtifactKind, path: &Path) -> Result<Vec<u8>, ArtifactLoadError> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(ArtifactLoadError::NotFound { kind, path: display });
    }

    fs::read(path).map_err(|source| ArtifactLoadError::Io {
        kind,
        path: display,
        source,
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

fn metadata_for(
    kind: ArtifactKind,
    path: &Path,
    bytes: &[u8],
    model_type: &str,
    n_features: Option<usize>,
) -> ArtifactMetadata {
    ArtifactMetadata {
        kind,
        path: path.display().to_string(),
        model_type: model_type.to_string(),
        sha256: sha256_hex(bytes),
        size_bytes: bytes.len() as u64,
        n_features,
        loaded_at: Utc::now(),
    }
}

/// Load a fitted scaler document (`.json`)
pub fn load_scaler(path: impl AsRef<Path>) -> Result<LoadedScaler, ArtifactLoadError> {
    let path = path.as_ref();
    let kind = ArtifactKind::Scaler;
    log::info!("Loading scaler from: {}", path.display());

    if extension(path) != "json" {
        return Err(ArtifactLoadError::UnsupportedFormat {
            kind,
            path: path.display().to_string(),
            reason: "scalers are read from .json documents".to_string(),
        });
    }

    let bytes = read_artifact(kind, path)?;
    let artifact: ScalerArtifact =
        serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Parse {
            kind,
            path: path.display().to_string(),
            source,
        })?;
    artifact.check().map_err(|reason| ArtifactLoadError::Invalid {
        kind,
        path: path.display().to_string(),
        reason,
    })?;

    let transform = artifact.into_transform();
    let metadata = metadata_for(
        kind,
        path,
        &bytes,
        transform.kind(),
        Some(transform.n_features()),
    );

    log::info!(
        "Scaler loaded: {} with {} features (sha256 {})",
        metadata.model_type,
        transform.n_features(),
        metadata.sha256
    );

    Ok(LoadedScaler { transform, metadata })
}

/// Load a classifier (`.json` coefficients, or `.onnx` with the `onnx` feature)
pub fn load_classifier(path: impl AsRef<Path>) -> Result<LoadedClassifier, ArtifactLoadError> {
    let path = path.as_ref();
    let kind = ArtifactKind::Classifier;
    log::info!("Loading classifier from: {}", path.display());

    let (classifier, bytes) = match extension(path).as_str() {
        "json" => {
            let bytes = read_artifact(kind, path)?;
            let artifact: ClassifierArtifact =
                serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Parse {
                    kind,
                    path: path.display().to_string(),
                    source,
                })?;
            artifact.check().map_err(|reason| ArtifactLoadError::Invalid {
                kind,
                path: path.display().to_string(),
                reason,
            })?;
            (artifact.into_classifier(), bytes)
        }
        "onnx" => load_onnx(path)?,
        other => {
            return Err(ArtifactLoadError::UnsupportedFormat {
                kind,
                path: path.display().to_string(),
                reason: format!("unknown extension {other:?}"),
            })
        }
    };

    let metadata = metadata_for(kind, path, &bytes, classifier.kind(), classifier.n_features());

    log::info!(
        "Classifier loaded: {} (sha256 {})",
        metadata.model_type,
        metadata.sha256
    );

    Ok(LoadedClassifier { classifier, metadata })
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path) -> Result<(Box<dyn Classifier>, Vec<u8>), ArtifactLoadError> {
    let bytes = read_artifact(ArtifactKind::Classifier, path)?;
    let classifier = super::onnx::OnnxClassifier::from_bytes(&bytes).map_err(|reason| {
        ArtifactLoadError::Invalid {
            kind: ArtifactKind::Classifier,
            path: path.display().to_string(),
            reason,
        }
    })?;
    Ok((Box::new(classifier), bytes))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path) -> Result<(Box<dyn Classifier>, Vec<u8>), ArtifactLoadError> {
    Err(ArtifactLoadError::UnsupportedFormat {
        kind: ArtifactKind::Classifier,
        path: path.display().to_string(),
        reason: "built without the `onnx` feature".to_string(),
    })
}
