//! Encoder - StudentRecord → FeatureVector
//!
//! Categorical fields become their fixed integer codes, numeric fields pass
//! through unchanged. Total over the record type, so there is no error path.

use super::layout::FEATURE_COUNT;
use super::vector::FeatureVector;
use crate::logic::record::{EducationLevel, Gender, StudentRecord, YesNo};

pub fn encode_gender(gender: Gender) -> f64 {
    f64::from(gender.code())
}

pub fn encode_education(level: EducationLevel) -> f64 {
    f64::from(level.code())
}

pub fn encode_yes_no(answer: YesNo) -> f64 {
    f64::from(answer.code())
}

/// Encode a record in FEATURE_LAYOUT order
pub fn encode(record: &StudentRecord) -> FeatureVector {
    let values: [f64; FEATURE_COUNT] = [
        encode_gender(record.gender),
        f64::from(record.age),
        encode_education(record.parent_education_level),
        f64::from(record.study_time),
        f64::from(record.failures),
        f64::from(record.absences),
        encode_yes_no(record.tutoring),
        encode_yes_no(record.test_preparation_course),
        f64::from(record.previous_score),
        f64::from(record.motivation_level),
        f64::from(record.stress_level),
        f64::from(record.final_grade),
    ];

    FeatureVector::from(values)
}
