//! ONNX Classifier - ONNX Runtime Integration
//!
//! Runs a classifier exported to ONNX (e.g. skl2onnx with `zipmap=False`).
//! The first input receives a `[1, n]` f32 tensor, the first output is read
//! as the int64 label and the second, when present, as class probabilities.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::classifier::{check_input, Classifier, ClassifierOutput, PredictionError};

pub struct OnnxClassifier {
    // `Session::run` needs exclusive access
    session: Mutex<Session>,
    label_output: String,
    probability_output: Option<String>,
}

impl OnnxClassifier {
    /// Load ONNX model from bytes
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, String> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| format!("Session builder error: {}", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| format!("Optimization error: {}", e))?
            .commit_from_memory(model_bytes)
            .map_err(|e| format!("Load from memory error: {}", e))?;

        if session.inputs.is_empty() {
            return Err("model declares no inputs".to_string());
        }
        let label_output = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| "model declares no outputs".to_string())?;
        let probability_output = session.outputs.get(1).map(|o| o.name.clone());

        Ok(Self {
            session: Mutex::new(session),
            label_output,
            probability_output,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &'static str {
        "OnnxClassifier"
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict(&self, features: &[f64]) -> Result<ClassifierOutput, PredictionError> {
        check_input(self.kind(), None, features)?;

        let input_array = Array2::<f32>::from_shape_vec(
            (1, features.len()),
            features.iter().map(|&v| v as f32).collect(),
        )
        .map_err(|e| PredictionError::Backend(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| PredictionError::Backend(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| PredictionError::Backend(format!("Inference failed: {}", e)))?;

        let label_value = outputs
            .get(&self.label_output)
            .ok_or_else(|| PredictionError::Backend("No label output".to_string()))?;
        let (_, labels) = label_value
            .try_extract_tensor::<i64>()
            .map_err(|e| PredictionError::Backend(format!("Extract error: {}", e)))?;
        let label = *labels
            .first()
            .ok_or_else(|| PredictionError::Backend("Empty label output".to_string()))?;

        let probability = self
            .probability_output
            .as_ref()
            .and_then(|name| outputs.get(name))
            .and_then(|value| value.try_extract_tensor::<f32>().ok())
            .and_then(|(_, probs)| probs.get(1).copied())
            .map(f64::from);

        Ok(ClassifierOutput { label, probability })
    }
}
