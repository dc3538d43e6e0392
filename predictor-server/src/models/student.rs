//! Student form model
//!
//! Widget-level constraints only: each numeric field is range-checked, each
//! categorical field must be one of its listed labels.

use serde::{Deserialize, Serialize};
use validator::Validate;

use student_predictor_core::{EducationLevel, Gender, StudentRecord, YesNo};

use crate::{AppError, AppResult};

/// Form/JSON body with the twelve student fields
///
/// Numeric fields are wide integers so an out-of-range value reaches the
/// range check instead of failing to parse.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StudentForm {
    #[serde(rename = "Gender")]
    pub gender: Gender,

    #[serde(rename = "Age")]
    #[validate(range(min = 15, max = 22, message = "Age must be between 15 and 22"))]
    pub age: i64,

    #[serde(rename = "Parent_Education_Level")]
    pub parent_education_level: EducationLevel,

    #[serde(rename = "Study_Time")]
    #[validate(range(min = 1, max = 10, message = "Study Time must be between 1 and 10"))]
    pub study_time: i64,

    #[serde(rename = "Failures")]
    #[validate(range(min = 0, max = 5, message = "Failures must be between 0 and 5"))]
    pub failures: i64,

    #[serde(rename = "Absences")]
    #[validate(range(min = 0, max = 50, message = "Absences must be between 0 and 50"))]
    pub absences: i64,

    #[serde(rename = "Tutoring")]
    pub tutoring: YesNo,

    #[serde(rename = "Test_Preparation_Course")]
    pub test_preparation_course: YesNo,

    #[serde(rename = "Previous_Score")]
    #[validate(range(min = 0, max = 100, message = "Previous Score must be between 0 and 100"))]
    pub previous_score: i64,

    #[serde(rename = "Motivation_Level")]
    #[validate(range(min = 1, max = 10, message = "Motivation Level must be between 1 and 10"))]
    pub motivation_level: i64,

    #[serde(rename = "Stress_Level")]
    #[validate(range(min = 1, max = 10, message = "Stress Level must be between 1 and 10"))]
    pub stress_level: i64,

    #[serde(rename = "Final_Grade")]
    #[validate(range(min = 0, max = 20, message = "Final Grade must be between 0 and 20"))]
    pub final_grade: i64,
}

fn narrow(field: &str, value: i64) -> AppResult<u8> {
    u8::try_from(value)
        .map_err(|_| AppError::ValidationError(format!("{field} is out of range: {value}")))
}

impl StudentForm {
    /// Validate widget ranges and build the record
    pub fn into_record(self) -> AppResult<StudentRecord> {
        self.validate()?;

        let record = StudentRecord {
            gender: self.gender,
            age: narrow("Age", self.age)?,
            parent_education_level: self.parent_education_level,
            study_time: narrow("Study_Time", self.study_time)?,
            failures: narrow("Failures", self.failures)?,
            absences: narrow("Absences", self.absences)?,
            tutoring: self.tutoring,
            test_preparation_course: self.test_preparation_course,
            previous_score: narrow("Previous_Score", self.previous_score)?,
            motivation_level: narrow("Motivation_Level", self.motivation_level)?,
            stress_level: narrow("Stress_Level", self.stress_level)?,
            final_grade: narrow("Final_Grade", self.final_grade)?,
        };

        if let Some((spec, value)) = record.out_of_range() {
            return Err(AppError::ValidationError(format!(
                "{} must be between {} and {}, got {}",
                spec.label, spec.min, spec.max, value
            )));
        }

        Ok(record)
    }
}

impl From<StudentRecord> for StudentForm {
    fn from(record: StudentRecord) -> Self {
        Self {
            gender: record.gender,
            age: record.age.into(),
            parent_education_level: record.parent_education_level,
            study_time: record.study_time.into(),
            failures: record.failures.into(),
            absences: record.absences.into(),
            tutoring: record.tutoring,
            test_preparation_course: record.test_preparation_course,
            previous_score: record.previous_score.into(),
            motivation_level: record.motivation_level.into(),
            stress_level: record.stress_level.into(),
            final_grade: record.final_grade.into(),
        }
    }
}
