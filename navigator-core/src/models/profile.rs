use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::age_category::AgeCategory;
use crate::models::deduction::DeductionClaims;

/// City class for the HRA exemption, which is more generous in the four
/// metros (Delhi, Mumbai, Kolkata, Chennai).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CityCategory {
    Metro,
    NonMetro,
}

impl CityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metro => "metro",
            Self::NonMetro => "non-metro",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "metro" => Some(Self::Metro),
            "non-metro" => Some(Self::NonMetro),
            _ => None,
        }
    }
}

impl fmt::Display for CityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rent and house rent allowance figures for the HRA exemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseRent {
    /// HRA component of salary actually received over the year.
    pub hra_received: Decimal,
    /// Rent actually paid over the year.
    pub rent_paid: Decimal,
    pub city: CityCategory,
}

/// Everything about the taxpayer a calculation needs.
///
/// Gross income is the full-year figure before any deduction. Claims are
/// entered as-is; capping happens during calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    pub gross_income: Decimal,
    pub age_category: AgeCategory,
    #[serde(default)]
    pub deductions: DeductionClaims,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_rent: Option<HouseRent>,
}
