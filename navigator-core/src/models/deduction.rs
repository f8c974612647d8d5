use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::age_category::AgeCategory;
use crate::models::regime::TaxRegime;

/// Deduction and exemption sections of the Income Tax Act this crate knows
/// how to cap and apply.
///
/// | Section    | What it covers                              |
/// |------------|---------------------------------------------|
/// | 80C        | Investments (PPF, ELSS, LIC, tuition, ...)  |
/// | 80CCD(1B)  | Additional NPS contribution                 |
/// | 80CCD(2)   | Employer NPS contribution                   |
/// | 80D        | Medical insurance premiums                  |
/// | 80TTA      | Savings interest, below 60                  |
/// | 80TTB      | Deposit interest, 60 and above              |
/// | 24B        | Interest on a self-occupied home loan       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeductionSection {
    Section80C,
    Section80Ccd1b,
    Section80Ccd2,
    Section80D,
    Section80Tta,
    Section80Ttb,
    Section24B,
}

impl DeductionSection {
    pub const ALL: [DeductionSection; 7] = [
        Self::Section80C,
        Self::Section80Ccd1b,
        Self::Section80Ccd2,
        Self::Section80D,
        Self::Section80Tta,
        Self::Section80Ttb,
        Self::Section24B,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section80C => "80C",
            Self::Section80Ccd1b => "80CCD(1B)",
            Self::Section80Ccd2 => "80CCD(2)",
            Self::Section80D => "80D",
            Self::Section80Tta => "80TTA",
            Self::Section80Ttb => "80TTB",
            Self::Section24B => "24B",
        }
    }

    /// Case-insensitive parse accepting the common ways people write a
    /// section, e.g. both `80CCD(1B)` and `80CCD1B`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "80C" => Some(Self::Section80C),
            "80CCD(1B)" | "80CCD1B" => Some(Self::Section80Ccd1b),
            "80CCD(2)" | "80CCD2" => Some(Self::Section80Ccd2),
            "80D" => Some(Self::Section80D),
            "80TTA" => Some(Self::Section80Tta),
            "80TTB" => Some(Self::Section80Ttb),
            "24B" | "24(B)" => Some(Self::Section24B),
            _ => None,
        }
    }

    /// Whether the section can reduce taxable income under the given regime.
    ///
    /// The new regime forgoes almost all Chapter VI-A deductions; only the
    /// employer NPS contribution under 80CCD(2) survives.
    pub fn allowed_in(&self, regime: TaxRegime) -> bool {
        match regime {
            TaxRegime::Old => true,
            TaxRegime::New => matches!(self, Self::Section80Ccd2),
        }
    }

    /// Whether the taxpayer's age band permits claiming this section.
    ///
    /// 80TTA is for taxpayers below 60; 80TTB replaces it from 60 onward.
    pub fn allowed_for_age(&self, age_category: AgeCategory) -> bool {
        match self {
            Self::Section80Tta => !age_category.is_senior(),
            Self::Section80Ttb => age_category.is_senior(),
            _ => true,
        }
    }
}

impl fmt::Display for DeductionSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeductionSection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeductionSection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown deduction section '{raw}'")))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimParseError {
    #[error("expected SECTION=AMOUNT, got '{0}'")]
    MissingSeparator(String),
    #[error("unknown deduction section '{0}'")]
    UnknownSection(String),
    #[error("invalid amount '{value}' for section {section}")]
    InvalidAmount {
        section: DeductionSection,
        value: String,
    },
}

/// Amounts a taxpayer claims under each deduction section, before any caps
/// or regime rules are applied.
///
/// Claims are as-entered figures; capping and regime screening happen during
/// calculation so the caller can see what was trimmed and why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeductionClaims(BTreeMap<DeductionSection, Decimal>);

impl DeductionClaims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: DeductionSection, amount: Decimal) {
        self.0.insert(section, amount);
    }

    /// Claimed amount for a section, zero when nothing was entered.
    pub fn amount(&self, section: DeductionSection) -> Decimal {
        self.0.get(&section).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeductionSection, Decimal)> + '_ {
        self.0.iter().map(|(section, amount)| (*section, *amount))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses a single `SECTION=AMOUNT` entry as passed on a command line.
    ///
    /// # Example
    ///
    /// ```
    /// use navigator_core::models::{DeductionClaims, DeductionSection};
    /// use rust_decimal::Decimal;
    ///
    /// let (section, amount) = DeductionClaims::parse_entry("80c=1,50,000").unwrap();
    /// assert_eq!(section, DeductionSection::Section80C);
    /// assert_eq!(amount, Decimal::from(150_000));
    /// ```
    pub fn parse_entry(entry: &str) -> Result<(DeductionSection, Decimal), ClaimParseError> {
        let (section_raw, amount_raw) = entry
            .split_once('=')
            .ok_or_else(|| ClaimParseError::MissingSeparator(entry.to_string()))?;
        let section = DeductionSection::parse(section_raw)
            .ok_or_else(|| ClaimParseError::UnknownSection(section_raw.trim().to_string()))?;
        let amount = crate::money::parse_amount(amount_raw).map_err(|_| {
            ClaimParseError::InvalidAmount {
                section,
                value: amount_raw.trim().to_string(),
            }
        })?;
        Ok((section, amount))
    }
}

impl FromIterator<(DeductionSection, Decimal)> for DeductionClaims {
    fn from_iter<I: IntoIterator<Item = (DeductionSection, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
