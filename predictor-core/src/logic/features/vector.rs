//! Encoded model input
//!
//! A `FeatureVector` carries the layout stamp it was encoded with. Values
//! keep their real length; a short or long vector is rejected by the
//! scaler, not padded here.

use serde::{Deserialize, Serialize};

use super::layout::{
    feature_index, layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT,
    FEATURE_VERSION,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub version: u8,
    pub layout_hash: u32,
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// All-zero vector of the current width
    pub fn new() -> Self {
        Self::from_vec(vec![0.0; FEATURE_COUNT])
    }

    pub fn from_vec(values: Vec<f64>) -> Self {
        FeatureVector {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        self.get(feature_index(name)?)
    }

    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    pub fn is_compatible(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self::from_vec(values)
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_vec(values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_stamped_with_current_layout() {
        let vector = FeatureVector::new();
        assert_eq!((vector.version, vector.layout_hash), (FEATURE_VERSION, layout_hash()));
        assert_eq!(vector.len(), FEATURE_COUNT);
        assert!(vector.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn length_is_not_normalized() {
        let short = FeatureVector::from_vec(vec![1.0; 11]);
        assert_eq!(short.len(), 11);
        assert!(short.is_compatible());
        assert_eq!(short.get_by_name("Final_Grade"), None);

        let long: FeatureVector = vec![1.0; 13].into();
        assert_eq!(long.len(), 13);
    }

    #[test]
    fn lookup_by_name() {
        let mut values = [0.0; FEATURE_COUNT];
        values[8] = 85.0;
        let vector = FeatureVector::from(values);
        assert_eq!(vector.get_by_name("Previous_Score"), Some(85.0));
        assert_eq!(vector.get_by_name("G3"), None);
    }

    #[test]
    fn foreign_stamp_is_incompatible() {
        let mut vector = FeatureVector::new();
        vector.layout_hash ^= 0xff;
        assert!(!vector.is_compatible());
    }
}
