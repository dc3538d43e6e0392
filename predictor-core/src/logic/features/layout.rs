//! Column order of the fitted artifacts
//!
//! Both artifacts were fitted on the twelve student columns in this exact
//! order. Any change to the list (new column, removed column, reordering)
//! bumps `FEATURE_VERSION`, which changes the layout hash stamped on every
//! `FeatureVector`.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current layout version
pub const FEATURE_VERSION: u8 = 1;

/// Number of columns in the layout
pub const FEATURE_COUNT: usize = 12;

/// Column names, as recorded in a scaler's `feature_names`
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "Gender",                  // Male=0, Female=1
    "Age",
    "Parent_Education_Level",  // Primary=0 .. PhD=5
    "Study_Time",
    "Failures",
    "Absences",
    "Tutoring",                // Yes=1, No=0
    "Test_Preparation_Course", // Yes=1, No=0
    "Previous_Score",
    "Motivation_Level",
    "Stress_Level",
    "Final_Grade",
];

/// CRC32 over `version` followed by each NUL-terminated name
pub fn compute_hash_for<'a>(version: u8, names: impl IntoIterator<Item = &'a str>) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Hash of the current layout
pub fn layout_hash() -> u32 {
    compute_hash_for(FEATURE_VERSION, FEATURE_LAYOUT)
}

/// Position of a column by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Column name at a position
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

/// Layout summary reported by the status endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        LayoutInfo {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.map(String::from).to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "vector was encoded for layout v{actual_version} ({actual_hash:08x}), \
     current layout is v{expected_version} ({expected_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Check a version/hash stamp against the current layout
pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    let expected_hash = layout_hash();
    if version == FEATURE_VERSION && hash == expected_hash {
        return Ok(());
    }
    Err(LayoutMismatchError {
        expected_version: FEATURE_VERSION,
        expected_hash,
        actual_version: version,
        actual_hash: hash,
    })
}

/// First position where `names` disagrees with the layout, as
/// `(index, layout name, given name)`; a missing name reads as `""`
pub fn first_name_mismatch<S: AsRef<str>>(names: &[S]) -> Option<(usize, String, String)> {
    let len = names.len().max(FEATURE_COUNT);
    (0..len).find_map(|i| {
        let ours = feature_name(i).unwrap_or("");
        let theirs = names.get(i).map_or("", |n| n.as_ref());
        (ours != theirs).then(|| (i, ours.to_string(), theirs.to_string()))
    })
}
