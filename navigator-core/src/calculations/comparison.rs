//! Side-by-side pricing of both regimes for one profile.
//!
//! Runs the full liability computation under each regime, names the cheaper
//! one, and lists the deduction headroom the taxpayer is leaving unused.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::liability::{ComputeError, RegimeCalculator, TaxComputation};
use crate::models::{DeductionSection, TaxRegime, TaxpayerProfile};
use crate::money::format_inr_whole;

/// Both computations plus the recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub old_regime: TaxComputation,
    pub new_regime: TaxComputation,

    /// The regime with the lower total. Ties go to the old regime, which
    /// keeps every deduction open.
    pub recommended: TaxRegime,

    /// Absolute difference between the two totals.
    pub tax_saved: Decimal,

    /// Unused deduction headroom worth a look, old regime terms.
    pub suggestions: Vec<String>,
}

impl<'a> RegimeCalculator<'a> {
    /// Prices the profile under both regimes and recommends the cheaper one.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeError`] under the same conditions as
    /// [`RegimeCalculator::compute`].
    pub fn compare(&self, profile: &TaxpayerProfile) -> Result<RegimeComparison, ComputeError> {
        let old_regime = self.compute(profile, TaxRegime::Old)?;
        let new_regime = self.compute(profile, TaxRegime::New)?;

        let recommended = if new_regime.total_payable < old_regime.total_payable {
            TaxRegime::New
        } else {
            TaxRegime::Old
        };
        let tax_saved = (old_regime.total_payable - new_regime.total_payable).abs();
        let suggestions = self.saving_suggestions(profile);

        Ok(RegimeComparison {
            old_regime,
            new_regime,
            recommended,
            tax_saved,
            suggestions,
        })
    }

    fn saving_suggestions(&self, profile: &TaxpayerProfile) -> Vec<String> {
        let caps = &self.config().deduction_caps;
        let mut suggestions = Vec::new();

        let claimed_80c = profile.deductions.amount(DeductionSection::Section80C);
        if claimed_80c < caps.section_80c {
            suggestions.push(format!(
                "Investing {} more under section 80C (PPF, ELSS, EPF) would use the full {} limit.",
                format_inr_whole(caps.section_80c - claimed_80c),
                format_inr_whole(caps.section_80c),
            ));
        }

        let claimed_nps = profile.deductions.amount(DeductionSection::Section80Ccd1b);
        if claimed_nps < caps.section_80ccd_1b {
            suggestions.push(format!(
                "An extra {} in NPS under 80CCD(1B) is deductible over and above the 80C limit.",
                format_inr_whole(caps.section_80ccd_1b - claimed_nps),
            ));
        }

        if profile.deductions.amount(DeductionSection::Section80D).is_zero() {
            suggestions.push(
                "Health insurance premiums are deductible under 80D; nothing is claimed there."
                    .to_string(),
            );
        }

        suggestions
    }
}
