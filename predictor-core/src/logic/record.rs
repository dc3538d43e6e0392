//! Student Record - Raw form input
//!
//! Twelve fixed fields in the order the scaler and classifier were fitted on.
//! Categorical fields are closed enums, so an unmapped category can never
//! reach the encoder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CATEGORICAL FIELDS
// ============================================================================

/// Error returned when a form label does not name a known category
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} value: {value:?}")]
pub struct ParseCategoryError {
    pub field: &'static str,
    pub value: String,
}

/// Student gender, encoded in slot 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Options in form order
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Integer code the artifacts were fitted on
    pub fn code(self) -> u8 {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }

    /// Label shown in the form and accepted on input
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Highest education level of a parent, ordered Primary → PhD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    Primary,
    Secondary,
    #[serde(rename = "High School")]
    HighSchool,
    Bachelor,
    Master,
    PhD,
}

impl EducationLevel {
    /// Options in form order
    pub const ALL: [EducationLevel; 6] = [
        EducationLevel::Primary,
        EducationLevel::Secondary,
        EducationLevel::HighSchool,
        EducationLevel::Bachelor,
        EducationLevel::Master,
        EducationLevel::PhD,
    ];

    /// Integer code the artifacts were fitted on
    pub fn code(self) -> u8 {
        match self {
            EducationLevel::Primary => 0,
            EducationLevel::Secondary => 1,
            EducationLevel::HighSchool => 2,
            EducationLevel::Bachelor => 3,
            EducationLevel::Master => 4,
            EducationLevel::PhD => 5,
        }
    }

    /// Label shown in the form and accepted on input
    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::Primary => "Primary",
            EducationLevel::Secondary => "Secondary",
            EducationLevel::HighSchool => "High School",
            EducationLevel::Bachelor => "Bachelor",
            EducationLevel::Master => "Master",
            EducationLevel::PhD => "PhD",
        }
    }
}

/// Yes/No answer (Tutoring, Test_Preparation_Course)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Options in form order
    pub const ALL: [YesNo; 2] = [YesNo::Yes, YesNo::No];

    /// Integer code the artifacts were fitted on
    pub fn code(self) -> u8 {
        match self {
            YesNo::Yes => 1,
            YesNo::No => 0,
        }
    }

    /// Label shown in the form and accepted on input
    pub fn label(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

macro_rules! label_parsing {
    ($ty:ty, $field:literal) => {
        impl FromStr for $ty {
            type Err = ParseCategoryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.label() == s)
                    .ok_or_else(|| ParseCategoryError {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

label_parsing!(Gender, "Gender");
label_parsing!(EducationLevel, "Parent_Education_Level");
label_parsing!(YesNo, "Yes/No");

// ============================================================================
// NUMERIC FIELD SPECS
// ============================================================================

/// Widget constraints for a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: u8,
    pub max: u8,
    pub default: u8,
}

impl FieldSpec {
    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const AGE: FieldSpec = FieldSpec { name: "Age", label: "Age", min: 15, max: 22, default: 15 };
pub const STUDY_TIME: FieldSpec = FieldSpec {
    name: "Study_Time",
    label: "Study Time (hours/day)",
    min: 1,
    max: 10,
    default: 1,
};
pub const FAILURES: FieldSpec = FieldSpec {
    name: "Failures",
    label: "Number of Failures",
    min: 0,
    max: 5,
    default: 0,
};
pub const ABSENCES: FieldSpec = FieldSpec {
    name: "Absences",
    label: "Number of Absences",
    min: 0,
    max: 50,
    default: 0,
};
pub const PREVIOUS_SCORE: FieldSpec = FieldSpec {
    name: "Previous_Score",
    label: "Previous Score (%)",
    min: 0,
    max: 100,
    default: 0,
};
pub const MOTIVATION_LEVEL: FieldSpec = FieldSpec {
    name: "Motivation_Level",
    label: "Motivation Level (1-10)",
    min: 1,
    max: 10,
    default: 1,
};
pub const STRESS_LEVEL: FieldSpec = FieldSpec {
    name: "Stress_Level",
    label: "Stress Level (1-10)",
    min: 1,
    max: 10,
    default: 1,
};
pub const FINAL_GRADE: FieldSpec = FieldSpec {
    name: "Final_Grade",
    label: "Final Grade (out of 20)",
    min: 0,
    max: 20,
    default: 0,
};

/// All numeric fields in record order
pub const NUMERIC_FIELDS: [FieldSpec; 8] = [
    AGE,
    STUDY_TIME,
    FAILURES,
    ABSENCES,
    PREVIOUS_SCORE,
    MOTIVATION_LEVEL,
    STRESS_LEVEL,
    FINAL_GRADE,
];

// ============================================================================
// STUDENT RECORD
// ============================================================================

/// One form submission
///
/// Field order is the fitted feature order. Serde names match the form
/// field names (`Gender`, `Parent_Education_Level`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Age")]
    pub age: u8,
    #[serde(rename = "Parent_Education_Level")]
    pub parent_education_level: EducationLevel,
    #[serde(rename = "Study_Time")]
    pub study_time: u8,
    #[serde(rename = "Failures")]
    pub failures: u8,
    #[serde(rename = "Absences")]
    pub absences: u8,
    #[serde(rename = "Tutoring")]
    pub tutoring: YesNo,
    #[serde(rename = "Test_Preparation_Course")]
    pub test_preparation_course: YesNo,
    #[serde(rename = "Previous_Score")]
    pub previous_score: u8,
    #[serde(rename = "Motivation_Level")]
    pub motivation_level: u8,
    #[serde(rename = "Stress_Level")]
    pub stress_level: u8,
    #[serde(rename = "Final_Grade")]
    pub final_grade: u8,
}

impl StudentRecord {
    /// Numeric fields paired with their widget spec, in record order
    pub fn numeric_fields(&self) -> [(FieldSpec, u8); 8] {
        [
            (AGE, self.age),
            (STUDY_TIME, self.study_time),
            (FAILURES, self.failures),
            (ABSENCES, self.absences),
            (PREVIOUS_SCORE, self.previous_score),
            (MOTIVATION_LEVEL, self.motivation_level),
            (STRESS_LEVEL, self.stress_level),
            (FINAL_GRADE, self.final_grade),
        ]
    }

    /// First numeric field outside its widget range, if any
    pub fn out_of_range(&self) -> Option<(FieldSpec, u8)> {
        self.numeric_fields()
            .into_iter()
            .find(|(spec, value)| !spec.contains(*value))
    }
}

impl Default for StudentRecord {
    /// The values a freshly rendered form starts with
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            age: AGE.default,
            parent_education_level: EducationLevel::Primary,
            study_time: STUDY_TIME.default,
            failures: FAILURES.default,
            absences: ABSENCES.default,
            tutoring: YesNo::Yes,
            test_preparation_course: YesNo::Yes,
            previous_score: PREVIOUS_SCORE.default,
            motivation_level: MOTIVATION_LEVEL.default,
            stress_level: STRESS_LEVEL.default,
            final_grade: FINAL_GRADE.default,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
