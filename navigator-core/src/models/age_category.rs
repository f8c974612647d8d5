use std::fmt;

use serde::{Deserialize, Serialize};

/// Age bands that change which deductions and caps apply.
///
/// Senior citizens (60 and above) get a higher medical insurance cap and
/// claim savings interest under 80TTB instead of 80TTA. Super seniors
/// (80 and above) share the senior caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeCategory {
    Normal,
    Senior,
    SuperSenior,
}

impl AgeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Senior => "senior",
            Self::SuperSenior => "super-senior",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Self::Normal),
            "senior" => Some(Self::Senior),
            "super-senior" => Some(Self::SuperSenior),
            _ => None,
        }
    }

    /// Category for a taxpayer of the given age in completed years.
    pub fn from_age(age: u8) -> Self {
        if age >= 80 {
            Self::SuperSenior
        } else if age >= 60 {
            Self::Senior
        } else {
            Self::Normal
        }
    }

    /// True for both senior and super senior citizens.
    pub fn is_senior(&self) -> bool {
        matches!(self, Self::Senior | Self::SuperSenior)
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
