//! TOML levy file loading.
//!
//! A levy file carries everything for one fiscal year except the slab
//! schedules: standard deductions, rebate thresholds, surcharge tiers,
//! deduction ceilings, and the cess rate. Combining a parsed [`LevyFile`]
//! with the slab schedules for the same year yields a complete
//! [`FiscalYearConfig`].

use std::collections::HashMap;

use navigator_core::{
    DeductionCaps, FiscalYear, FiscalYearConfig, RegimeRules, SlabSchedule, SurchargeSchedule,
    SurchargeTier, TaxRegime,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors produced while parsing or resolving levy files.
#[derive(Debug, Error)]
pub enum LevyError {
    /// The TOML text could not be parsed.
    #[error("failed to parse levy TOML: {0}")]
    TomlParse(String),

    /// The levy file names a year and regime with no loaded slab schedule.
    #[error("no slab schedule loaded for {year} ({regime})")]
    MissingSchedule { year: FiscalYear, regime: TaxRegime },
}

/// Per-regime amounts as they appear in a levy file.
///
/// Amounts are written as quoted strings (`"50000"`, `"0.10"`) so they
/// deserialize into [`Decimal`] without passing through floating point.
#[derive(Debug, Clone, Deserialize)]
pub struct RegimeLevies {
    pub standard_deduction: Decimal,
    pub rebate_threshold: Decimal,
    #[serde(default)]
    pub marginal_relief: bool,
    #[serde(default)]
    pub surcharge: Vec<SurchargeTier>,
}

impl RegimeLevies {
    fn into_rules(self, slabs: SlabSchedule) -> RegimeRules {
        RegimeRules {
            slabs,
            standard_deduction: self.standard_deduction,
            rebate_threshold: self.rebate_threshold,
            surcharge: SurchargeSchedule {
                tiers: self.surcharge,
                marginal_relief: self.marginal_relief,
            },
        }
    }
}

/// One fiscal year's levy file, parsed but not yet joined with slabs.
#[derive(Debug, Clone, Deserialize)]
pub struct LevyFile {
    pub fiscal_year: FiscalYear,
    pub cess_rate: Decimal,
    pub old_regime: RegimeLevies,
    pub new_regime: RegimeLevies,
    pub deduction_caps: DeductionCaps,
}

impl LevyFile {
    /// Parses a levy file from TOML text.
    pub fn parse(text: &str) -> Result<Self, LevyError> {
        toml::from_str(text).map_err(|err| LevyError::TomlParse(err.to_string()))
    }

    /// Joins this levy file with the slab schedules for its fiscal year.
    ///
    /// The result has not been validated; [`FiscalYearConfig::validate`]
    /// runs when the config is registered.
    pub fn into_config(
        self,
        schedules: &HashMap<(FiscalYear, TaxRegime), SlabSchedule>,
    ) -> Result<FiscalYearConfig, LevyError> {
        let year = self.fiscal_year;
        let old_slabs = schedules
            .get(&(year, TaxRegime::Old))
            .cloned()
            .ok_or(LevyError::MissingSchedule {
                year,
                regime: TaxRegime::Old,
            })?;
        let new_slabs = schedules
            .get(&(year, TaxRegime::New))
            .cloned()
            .ok_or(LevyError::MissingSchedule {
                year,
                regime: TaxRegime::New,
            })?;

        Ok(FiscalYearConfig {
            fiscal_year: year,
            old_regime: self.old_regime.into_rules(old_slabs),
            new_regime: self.new_regime.into_rules(new_slabs),
            deduction_caps: self.deduction_caps,
            cess_rate: self.cess_rate,
        })
    }
}
