use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid fiscal year '{0}'; expected the form \"2024-25\"")]
pub struct ParseFiscalYearError(pub String);

/// An Indian fiscal year, April 1 to March 31, stored by its start year.
///
/// Displays in the conventional `2024-25` form. The assessment year is the
/// one after, when the return for this year is filed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct FiscalYear(pub i32);

impl FiscalYear {
    /// Parses the `2024-25` form, insisting the short end year follows the
    /// start year.
    pub fn parse(s: &str) -> Result<Self, ParseFiscalYearError> {
        let err = || ParseFiscalYearError(s.to_string());
        let (start_raw, end_raw) = s.split_once('-').ok_or_else(err)?;
        if start_raw.len() != 4 || end_raw.len() != 2 {
            return Err(err());
        }
        let start: i32 = start_raw.parse().map_err(|_| err())?;
        let end: i32 = end_raw.parse().map_err(|_| err())?;
        if start < 1000 || end != (start + 1) % 100 {
            return Err(err());
        }
        Ok(Self(start))
    }

    /// Fiscal year a calendar date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        if date.month() >= 4 {
            Self(date.year())
        } else {
            Self(date.year() - 1)
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 4, 1)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 + 1, 3, 31)
    }

    /// Label of the assessment year, e.g. `2025-26` for fiscal year 2024-25.
    pub fn assessment_year_label(&self) -> String {
        Self(self.0 + 1).to_string()
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.0, (self.0 + 1) % 100)
    }
}

impl TryFrom<String> for FiscalYear {
    type Error = ParseFiscalYearError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FiscalYear> for String {
    fn from(year: FiscalYear) -> Self {
        year.to_string()
    }
}
