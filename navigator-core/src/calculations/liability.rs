//! Tax liability computation for one regime.
//!
//! The computation follows the sequence a return preparer would use:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Validate the profile figures |
//! | 2    | Assemble deductions allowed under the regime |
//! | 3    | Taxable income (gross minus deductions, floor 0) |
//! | 4    | Slab-wise tax on taxable income |
//! | 5    | Section 87A rebate at or below the threshold |
//! | 6    | Surcharge above the configured thresholds, less marginal relief |
//! | 7    | Health and education cess on tax plus surcharge |
//! | 8    | Total payable |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use navigator_core::calculations::RegimeCalculator;
//! use navigator_core::models::{
//!     AgeCategory, DeductionCaps, DeductionClaims, DeductionSection, FiscalYear,
//!     FiscalYearConfig, IncomeSlab, MedicalInsuranceCaps, RegimeRules, SlabSchedule,
//!     SurchargeSchedule, TaxRegime, TaxpayerProfile,
//! };
//!
//! let old_slabs = SlabSchedule::new(vec![
//!     IncomeSlab { lower_bound: dec!(0), upper_bound: Some(dec!(250000)), rate: dec!(0) },
//!     IncomeSlab { lower_bound: dec!(250000), upper_bound: Some(dec!(500000)), rate: dec!(0.05) },
//!     IncomeSlab { lower_bound: dec!(500000), upper_bound: Some(dec!(1000000)), rate: dec!(0.20) },
//!     IncomeSlab { lower_bound: dec!(1000000), upper_bound: None, rate: dec!(0.30) },
//! ])
//! .unwrap();
//!
//! let old_regime = RegimeRules {
//!     slabs: old_slabs,
//!     standard_deduction: dec!(50000),
//!     rebate_threshold: dec!(500000),
//!     surcharge: SurchargeSchedule::default(),
//! };
//! let new_regime = old_regime.clone();
//!
//! let config = FiscalYearConfig {
//!     fiscal_year: FiscalYear(2024),
//!     old_regime,
//!     new_regime,
//!     deduction_caps: DeductionCaps {
//!         section_80c: dec!(150000),
//!         section_80ccd_1b: dec!(50000),
//!         section_80d: MedicalInsuranceCaps {
//!             normal: dec!(25000),
//!             senior: dec!(50000),
//!             super_senior: dec!(50000),
//!         },
//!         section_80tta: dec!(10000),
//!         section_80ttb: dec!(50000),
//!         section_24b: dec!(200000),
//!     },
//!     cess_rate: dec!(0.04),
//! };
//!
//! let mut deductions = DeductionClaims::new();
//! deductions.set(DeductionSection::Section80C, dec!(150000));
//! let profile = TaxpayerProfile {
//!     gross_income: dec!(800000),
//!     age_category: AgeCategory::Normal,
//!     deductions,
//!     house_rent: None,
//! };
//!
//! let calculator = RegimeCalculator::new(&config);
//! let result = calculator.compute(&profile, TaxRegime::Old).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(600000));
//! assert_eq!(result.basic_tax, dec!(32500.00));
//! assert_eq!(result.total_payable, dec!(33800.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{clamp_non_negative, round_half_up};
use crate::calculations::deductions::{self, DeductionBreakdown, RegimeWarning};
use crate::models::{
    AgeCategory, ConfigError, DeductionSection, FiscalYear, FiscalYearConfig, IncomeSlab,
    RegimeRules, SlabSchedule, TaxRegime, TaxpayerProfile,
};

/// Errors for an inconsistent profile or configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComputeError {
    /// Gross income below zero.
    #[error("gross income {0} is negative")]
    NegativeIncome(Decimal),

    /// A claim entered with a negative amount.
    #[error("claim of {amount} under section {section} is negative")]
    NegativeClaim {
        section: DeductionSection,
        amount: Decimal,
    },

    /// A claim under a section the taxpayer's age band rules out, such as
    /// 80TTB claimed by someone below 60.
    #[error("section {section} cannot be claimed by a {age_category} taxpayer")]
    AgeRestrictedSection {
        section: DeductionSection,
        age_category: AgeCategory,
    },

    /// Negative HRA or rent figures.
    #[error("house rent figures are negative")]
    NegativeHouseRent,

    /// The fiscal year configuration failed validation.
    #[error("fiscal year configuration is invalid")]
    InvalidConfig(#[from] ConfigError),
}

/// Tax contributed by one slab the taxable income reaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabTax {
    pub slab: IncomeSlab,
    pub income_in_slab: Decimal,
    pub tax: Decimal,
}

/// Outcome of the section 87A rebate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebateOutcome {
    /// True when the rebate wiped a positive basic tax.
    pub applied: bool,
    pub amount: Decimal,
}

/// Full worksheet of one regime computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    pub fiscal_year: FiscalYear,
    pub regime: TaxRegime,
    pub gross_income: Decimal,
    pub deductions: DeductionBreakdown,
    pub taxable_income: Decimal,

    /// Slabs the taxable income reaches, with the tax each contributes.
    pub slab_breakdown: Vec<SlabTax>,

    /// Slab tax before rebate, surcharge, and cess.
    pub basic_tax: Decimal,
    pub rebate: RebateOutcome,
    pub surcharge: Decimal,

    /// Surcharge forgone so the tier does not cost more than the income
    /// above its threshold.
    pub marginal_relief: Decimal,
    pub cess: Decimal,
    pub total_payable: Decimal,

    /// Claims the regime ignored, in the order they were seen.
    pub warnings: Vec<RegimeWarning>,
}

/// Calculator for a single fiscal year's configuration.
///
/// Holds a borrow of the configuration; one instance can price any number
/// of profiles under either regime.
#[derive(Debug, Clone)]
pub struct RegimeCalculator<'a> {
    config: &'a FiscalYearConfig,
}

impl<'a> RegimeCalculator<'a> {
    pub fn new(config: &'a FiscalYearConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FiscalYearConfig {
        self.config
    }

    /// Computes the complete liability for a profile under one regime.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeError`] when the configuration fails validation or
    /// the profile carries negative figures or an age-inconsistent claim.
    pub fn compute(
        &self,
        profile: &TaxpayerProfile,
        regime: TaxRegime,
    ) -> Result<TaxComputation, ComputeError> {
        self.config.validate()?;
        self.validate_profile(profile)?;

        let (deductions, warnings) = deductions::assemble(profile, regime, self.config);
        let rules = self.config.rules_for(regime);

        let taxable_income = self.taxable_income(profile.gross_income, deductions.total);

        let slab_breakdown = self.slab_breakdown(&rules.slabs, taxable_income);
        let basic_tax = round_half_up(
            slab_breakdown
                .iter()
                .map(|entry| entry.tax)
                .sum::<Decimal>(),
        );

        let rebate = self.rebate(rules, taxable_income, basic_tax);
        let tax_after_rebate = basic_tax - rebate.amount;

        let (surcharge, marginal_relief) = self.surcharge(rules, taxable_income, tax_after_rebate);

        let cess = round_half_up((tax_after_rebate + surcharge) * self.config.cess_rate);
        let total_payable = round_half_up(tax_after_rebate + surcharge + cess);

        debug!(
            regime = %regime,
            taxable = %taxable_income,
            total = %total_payable,
            "computed liability"
        );

        Ok(TaxComputation {
            fiscal_year: self.config.fiscal_year,
            regime,
            gross_income: profile.gross_income,
            deductions,
            taxable_income,
            slab_breakdown,
            basic_tax,
            rebate,
            surcharge,
            marginal_relief,
            cess,
            total_payable,
            warnings,
        })
    }

    /// Rejects profiles no regime can price.
    fn validate_profile(&self, profile: &TaxpayerProfile) -> Result<(), ComputeError> {
        if profile.gross_income < Decimal::ZERO {
            return Err(ComputeError::NegativeIncome(profile.gross_income));
        }
        for (section, amount) in profile.deductions.iter() {
            if amount < Decimal::ZERO {
                return Err(ComputeError::NegativeClaim { section, amount });
            }
            if amount > Decimal::ZERO && !section.allowed_for_age(profile.age_category) {
                return Err(ComputeError::AgeRestrictedSection {
                    section,
                    age_category: profile.age_category,
                });
            }
        }
        if let Some(house_rent) = &profile.house_rent {
            if house_rent.hra_received < Decimal::ZERO || house_rent.rent_paid < Decimal::ZERO {
                return Err(ComputeError::NegativeHouseRent);
            }
        }
        Ok(())
    }

    /// Calculates taxable income.
    fn taxable_income(
        &self,
        gross_income: Decimal,
        total_deductions: Decimal,
    ) -> Decimal {
        clamp_non_negative(round_half_up(gross_income - total_deductions))
    }

    /// Splits taxable income across the slabs it reaches.
    fn slab_breakdown(
        &self,
        schedule: &SlabSchedule,
        taxable_income: Decimal,
    ) -> Vec<SlabTax> {
        schedule
            .slabs()
            .iter()
            .filter_map(|slab| {
                let income_in_slab = slab.income_within(taxable_income);
                if income_in_slab.is_zero() {
                    return None;
                }
                Some(SlabTax {
                    slab: slab.clone(),
                    income_in_slab,
                    tax: round_half_up(income_in_slab * slab.rate),
                })
            })
            .collect()
    }

    /// Applies the section 87A rebate.
    ///
    /// The threshold is inclusive; taxable income exactly at it still earns
    /// the rebate, which wipes the basic tax entirely.
    fn rebate(
        &self,
        rules: &RegimeRules,
        taxable_income: Decimal,
        basic_tax: Decimal,
    ) -> RebateOutcome {
        let applied = taxable_income <= rules.rebate_threshold && basic_tax > Decimal::ZERO;
        RebateOutcome {
            applied,
            amount: if applied { basic_tax } else { Decimal::ZERO },
        }
    }

    /// Calculates the surcharge and any marginal relief.
    ///
    /// The highest tier whose threshold the taxable income exceeds sets the
    /// rate. With marginal relief on, tax plus surcharge is capped at the
    /// liability at the threshold plus the income earned above it.
    fn surcharge(
        &self,
        rules: &RegimeRules,
        taxable_income: Decimal,
        tax_after_rebate: Decimal,
    ) -> (Decimal, Decimal) {
        let tiers = &rules.surcharge.tiers;
        let Some(index) = tiers.iter().rposition(|t| taxable_income > t.threshold) else {
            return (Decimal::ZERO, Decimal::ZERO);
        };
        let tier = &tiers[index];
        let raw = round_half_up(tax_after_rebate * tier.rate);
        if !rules.surcharge.marginal_relief {
            return (raw, Decimal::ZERO);
        }

        let tax_at_threshold = self.tax_at(&rules.slabs, tier.threshold);
        let surcharge_at_threshold = match index {
            0 => Decimal::ZERO,
            _ => round_half_up(tax_at_threshold * tiers[index - 1].rate),
        };
        let ceiling =
            tax_at_threshold + surcharge_at_threshold + (taxable_income - tier.threshold);

        let excess = round_half_up(tax_after_rebate + raw - ceiling);
        if excess <= Decimal::ZERO {
            return (raw, Decimal::ZERO);
        }
        let relief = excess.min(raw);
        (round_half_up(raw - relief), relief)
    }

    /// Slab tax owed on exactly `income`, used for the relief ceiling.
    fn tax_at(
        &self,
        schedule: &SlabSchedule,
        income: Decimal,
    ) -> Decimal {
        let total: Decimal = schedule
            .slabs()
            .iter()
            .map(|slab| round_half_up(slab.income_within(income) * slab.rate))
            .sum();
        round_half_up(total)
    }
}
