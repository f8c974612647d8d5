use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::age_category::AgeCategory;
use crate::models::deduction::DeductionSection;
use crate::models::fiscal_year::FiscalYear;
use crate::models::regime::TaxRegime;
use crate::models::slab::{SlabSchedule, SlabScheduleError};

/// One surcharge step: the rate applies once taxable income exceeds the
/// threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeTier {
    pub threshold: Decimal,
    /// Fractional rate applied to the basic tax, e.g. `0.10` for 10%.
    pub rate: Decimal,
}

/// Surcharge tiers for one regime, ordered by rising threshold.
///
/// With `marginal_relief` on, the extra liability a tier adds is capped at
/// the income earned above its threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeSchedule {
    #[serde(default)]
    pub tiers: Vec<SurchargeTier>,
    #[serde(default)]
    pub marginal_relief: bool,
}

/// Medical insurance caps under 80D, which rise with age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalInsuranceCaps {
    pub normal: Decimal,
    pub senior: Decimal,
    pub super_senior: Decimal,
}

impl MedicalInsuranceCaps {
    pub fn for_age(&self, age_category: AgeCategory) -> Decimal {
        match age_category {
            AgeCategory::Normal => self.normal,
            AgeCategory::Senior => self.senior,
            AgeCategory::SuperSenior => self.super_senior,
        }
    }
}

/// Statutory ceilings on each deduction section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionCaps {
    pub section_80c: Decimal,
    pub section_80ccd_1b: Decimal,
    pub section_80d: MedicalInsuranceCaps,
    pub section_80tta: Decimal,
    pub section_80ttb: Decimal,
    pub section_24b: Decimal,
}

impl DeductionCaps {
    /// Ceiling for a section, `None` when the section is uncapped.
    pub fn cap_for(&self, section: DeductionSection, age_category: AgeCategory) -> Option<Decimal> {
        match section {
            DeductionSection::Section80C => Some(self.section_80c),
            DeductionSection::Section80Ccd1b => Some(self.section_80ccd_1b),
            DeductionSection::Section80Ccd2 => None,
            DeductionSection::Section80D => Some(self.section_80d.for_age(age_category)),
            DeductionSection::Section80Tta => Some(self.section_80tta),
            DeductionSection::Section80Ttb => Some(self.section_80ttb),
            DeductionSection::Section24B => Some(self.section_24b),
        }
    }
}

/// Slab schedule and regime-specific amounts for one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeRules {
    pub slabs: SlabSchedule,
    pub standard_deduction: Decimal,
    /// Taxable income at or below this zeroes the basic tax (section 87A).
    pub rebate_threshold: Decimal,
    #[serde(default)]
    pub surcharge: SurchargeSchedule,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {regime} regime slab schedule")]
    InvalidSlabs {
        regime: TaxRegime,
        #[source]
        source: SlabScheduleError,
    },
    #[error("negative standard deduction {value} in the {regime} regime")]
    NegativeStandardDeduction { regime: TaxRegime, value: Decimal },
    #[error("negative rebate threshold {value} in the {regime} regime")]
    NegativeRebateThreshold { regime: TaxRegime, value: Decimal },
    #[error("surcharge threshold {threshold} in the {regime} regime is not positive")]
    InvalidSurchargeThreshold { regime: TaxRegime, threshold: Decimal },
    #[error("surcharge rate {rate} in the {regime} regime is outside 0..=1")]
    InvalidSurchargeRate { regime: TaxRegime, rate: Decimal },
    #[error("surcharge thresholds in the {regime} regime must increase: {previous} then {next}")]
    UnorderedSurchargeTiers {
        regime: TaxRegime,
        previous: Decimal,
        next: Decimal,
    },
    #[error("negative cap {value} for section {section}")]
    NegativeCap {
        section: DeductionSection,
        value: Decimal,
    },
    #[error("cess rate {0} is outside 0..=1")]
    InvalidCessRate(Decimal),
}

/// Every number the law fixes for one fiscal year.
///
/// Amounts live in external data files rather than in code, so a new budget
/// means shipping a new file, not a new build. [`FiscalYearConfig::validate`]
/// runs before any calculation touches the figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYearConfig {
    pub fiscal_year: FiscalYear,
    pub old_regime: RegimeRules,
    pub new_regime: RegimeRules,
    pub deduction_caps: DeductionCaps,
    /// Health and education cess on tax plus surcharge, e.g. `0.04`.
    pub cess_rate: Decimal,
}

impl FiscalYearConfig {
    pub fn rules_for(&self, regime: TaxRegime) -> &RegimeRules {
        match regime {
            TaxRegime::Old => &self.old_regime,
            TaxRegime::New => &self.new_regime,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for regime in [TaxRegime::Old, TaxRegime::New] {
            validate_regime(regime, self.rules_for(regime))?;
        }

        let caps = &self.deduction_caps;
        let cap_fields = [
            (DeductionSection::Section80C, caps.section_80c),
            (DeductionSection::Section80Ccd1b, caps.section_80ccd_1b),
            (DeductionSection::Section80D, caps.section_80d.normal),
            (DeductionSection::Section80D, caps.section_80d.senior),
            (DeductionSection::Section80D, caps.section_80d.super_senior),
            (DeductionSection::Section80Tta, caps.section_80tta),
            (DeductionSection::Section80Ttb, caps.section_80ttb),
            (DeductionSection::Section24B, caps.section_24b),
        ];
        for (section, value) in cap_fields {
            if value < Decimal::ZERO {
                return Err(ConfigError::NegativeCap { section, value });
            }
        }

        if self.cess_rate < Decimal::ZERO || self.cess_rate > Decimal::ONE {
            return Err(ConfigError::InvalidCessRate(self.cess_rate));
        }
        Ok(())
    }
}

fn validate_regime(regime: TaxRegime, rules: &RegimeRules) -> Result<(), ConfigError> {
    rules
        .slabs
        .validate()
        .map_err(|source| ConfigError::InvalidSlabs { regime, source })?;

    if rules.standard_deduction < Decimal::ZERO {
        return Err(ConfigError::NegativeStandardDeduction {
            regime,
            value: rules.standard_deduction,
        });
    }
    if rules.rebate_threshold < Decimal::ZERO {
        return Err(ConfigError::NegativeRebateThreshold {
            regime,
            value: rules.rebate_threshold,
        });
    }

    let mut previous: Option<Decimal> = None;
    for tier in &rules.surcharge.tiers {
        if tier.threshold <= Decimal::ZERO {
            return Err(ConfigError::InvalidSurchargeThreshold {
                regime,
                threshold: tier.threshold,
            });
        }
        if tier.rate < Decimal::ZERO || tier.rate > Decimal::ONE {
            return Err(ConfigError::InvalidSurchargeRate {
                regime,
                rate: tier.rate,
            });
        }
        if let Some(previous) = previous {
            if tier.threshold <= previous {
                return Err(ConfigError::UnorderedSurchargeTiers {
                    regime,
                    previous,
                    next: tier.threshold,
                });
            }
        }
        previous = Some(tier.threshold);
    }
    Ok(())
}
