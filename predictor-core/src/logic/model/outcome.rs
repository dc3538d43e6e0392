//! Result mapping - classifier label → PASS / FAIL

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    /// 1 → PASS, 0 → FAIL; any other label is returned back as the error
    pub fn from_label(label: i64) -> Result<Self, i64> {
        match label {
            1 => Ok(Outcome::Pass),
            0 => Ok(Outcome::Fail),
            other => Err(other),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
        }
    }

    pub fn is_pass(self) -> bool {
        self == Outcome::Pass
    }

    /// Message shown to the user
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Pass => "Prediction: PASS. The student is likely to pass!",
            Outcome::Fail => "Prediction: FAIL. The student might fail. Needs improvement.",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
