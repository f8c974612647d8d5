//! Assembly of everything subtracted from gross income before the slabs.
//!
//! Both regimes run the same steps; what differs is which claims survive:
//!
//! | Step | Old regime                          | New regime                  |
//! |------|-------------------------------------|-----------------------------|
//! | 1    | Standard deduction                  | Standard deduction          |
//! | 2    | HRA exemption from rent figures     | Not available               |
//! | 3    | Section claims, capped per section  | Only 80CCD(2), uncapped     |
//!
//! Claims the chosen regime ignores come back as [`RegimeWarning`]s rather
//! than errors, so a calculation always proceeds with whatever is allowed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{
    CityCategory, DeductionSection, FiscalYearConfig, HouseRent, TaxRegime, TaxpayerProfile,
};
use crate::money::format_inr;

/// One section claim after regime screening and capping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDeduction {
    pub section: DeductionSection,

    /// Amount the taxpayer entered.
    pub claimed: Decimal,

    /// Amount that actually reduces taxable income, never above the
    /// section's cap.
    pub allowed: Decimal,
}

/// Everything subtracted from gross income before the slabs apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    pub standard_deduction: Decimal,

    /// House rent allowance exemption, old regime only.
    pub hra_exemption: Decimal,

    /// Per-section outcomes, in section order.
    pub sections: Vec<AppliedDeduction>,

    /// Sum of every allowed amount above.
    pub total: Decimal,
}

/// A claim the chosen regime does not recognise.
///
/// These are advisory. The claim is excluded and the calculation carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegimeWarning {
    DeductionNotAllowed {
        section: DeductionSection,
        claimed: Decimal,
    },
    HraNotAllowed {
        hra_received: Decimal,
    },
}

impl RegimeWarning {
    pub fn message(&self) -> String {
        match self {
            Self::DeductionNotAllowed { section, claimed } => format!(
                "section {section} is not deductible under the new regime; {} was ignored",
                format_inr(*claimed)
            ),
            Self::HraNotAllowed { hra_received } => format!(
                "the HRA exemption is not available under the new regime; {} received was ignored",
                format_inr(*hra_received)
            ),
        }
    }
}

/// Builds the deduction breakdown for a profile under one regime.
///
/// The profile is assumed validated; negative figures never reach here.
pub(crate) fn assemble(
    profile: &TaxpayerProfile,
    regime: TaxRegime,
    config: &FiscalYearConfig,
) -> (DeductionBreakdown, Vec<RegimeWarning>) {
    let rules = config.rules_for(regime);
    let mut warnings = Vec::new();

    let standard_deduction = if profile.gross_income > Decimal::ZERO {
        rules.standard_deduction
    } else {
        Decimal::ZERO
    };

    let hra_exemption = match (&profile.house_rent, regime) {
        (Some(house_rent), TaxRegime::Old) => hra_exemption(house_rent, profile.gross_income),
        (Some(house_rent), TaxRegime::New) => {
            if house_rent.hra_received > Decimal::ZERO || house_rent.rent_paid > Decimal::ZERO {
                warnings.push(RegimeWarning::HraNotAllowed {
                    hra_received: house_rent.hra_received,
                });
                warn!(
                    hra_received = %house_rent.hra_received,
                    "HRA exemption claimed under the new regime; ignoring"
                );
            }
            Decimal::ZERO
        }
        (None, _) => Decimal::ZERO,
    };

    let mut sections = Vec::new();
    for (section, claimed) in profile.deductions.iter() {
        if claimed.is_zero() {
            continue;
        }
        if !section.allowed_in(regime) {
            warnings.push(RegimeWarning::DeductionNotAllowed { section, claimed });
            warn!(
                section = %section,
                claimed = %claimed,
                "claim is not deductible under the new regime; ignoring"
            );
            continue;
        }
        let allowed = match config.deduction_caps.cap_for(section, profile.age_category) {
            Some(cap) if claimed > cap => {
                warn!(
                    section = %section,
                    claimed = %claimed,
                    cap = %cap,
                    "claim exceeds the statutory cap; trimming"
                );
                cap
            }
            _ => claimed,
        };
        sections.push(AppliedDeduction {
            section,
            claimed,
            allowed,
        });
    }

    let allowed_sum: Decimal = sections.iter().map(|entry| entry.allowed).sum();
    let total = round_half_up(standard_deduction + hra_exemption + allowed_sum);

    (
        DeductionBreakdown {
            standard_deduction,
            hra_exemption,
            sections,
            total,
        },
        warnings,
    )
}

/// HRA exemption as the least of HRA received, rent above a tenth of salary,
/// and half (metro) or forty percent (elsewhere) of salary.
///
/// All three inputs have to be positive for any exemption at all.
fn hra_exemption(house_rent: &HouseRent, salary: Decimal) -> Decimal {
    if house_rent.hra_received <= Decimal::ZERO
        || house_rent.rent_paid <= Decimal::ZERO
        || salary <= Decimal::ZERO
    {
        return Decimal::ZERO;
    }

    let rent_excess = (house_rent.rent_paid - salary * Decimal::new(10, 2)).max(Decimal::ZERO);
    let salary_share = match house_rent.city {
        CityCategory::Metro => salary * Decimal::new(50, 2),
        CityCategory::NonMetro => salary * Decimal::new(40, 2),
    };

    round_half_up(house_rent.hra_received.min(rent_excess).min(salary_share))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;
    use crate::models::{
        AgeCategory, DeductionCaps, DeductionClaims, FiscalYear, IncomeSlab, MedicalInsuranceCaps,
        RegimeRules, SlabSchedule, SurchargeSchedule,
    };

    fn slab(lower: Decimal, upper: Option<Decimal>, rate: Decimal) -> IncomeSlab {
        IncomeSlab {
            lower_bound: lower,
            upper_bound: upper,
            rate,
        }
    }

    fn test_config() -> FiscalYearConfig {
        let slabs = SlabSchedule::new(vec![
            slab(dec!(0), Some(dec!(250000)), dec!(0)),
            slab(dec!(250000), None, dec!(0.05)),
        ])
        .unwrap();
        let rules = RegimeRules {
            slabs,
            standard_deduction: dec!(50000),
            rebate_threshold: dec!(500000),
            surcharge: SurchargeSchedule::default(),
        };
        FiscalYearConfig {
            fiscal_year: FiscalYear(2024),
            old_regime: rules.clone(),
            new_regime: rules,
            deduction_caps: DeductionCaps {
                section_80c: dec!(150000),
                section_80ccd_1b: dec!(50000),
                section_80d: MedicalInsuranceCaps {
                    normal: dec!(25000),
                    senior: dec!(50000),
                    super_senior: dec!(50000),
                },
                section_80tta: dec!(10000),
                section_80ttb: dec!(50000),
                section_24b: dec!(200000),
            },
            cess_rate: dec!(0.04),
        }
    }

    fn profile(gross: Decimal) -> TaxpayerProfile {
        TaxpayerProfile {
            gross_income: gross,
            age_category: AgeCategory::Normal,
            deductions: DeductionClaims::new(),
            house_rent: None,
        }
    }

    /// Initializes tracing subscriber for tests that verify log output.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // ====== standard deduction ======

    #[test]
    fn standard_deduction_applies_to_any_positive_income() {
        let (breakdown, warnings) = assemble(&profile(dec!(800000)), TaxRegime::Old, &test_config());

        assert_eq!(breakdown.standard_deduction, dec!(50000));
        assert_eq!(breakdown.total, dec!(50000));
        assert!(warnings.is_empty());
    }

    #[test]
    fn zero_income_gets_no_standard_deduction() {
        let (breakdown, _) = assemble(&profile(dec!(0)), TaxRegime::New, &test_config());

        assert_eq!(breakdown.standard_deduction, dec!(0));
        assert_eq!(breakdown.total, dec!(0));
    }

    // ====== section caps, old regime ======

    #[test]
    fn claims_above_the_cap_are_trimmed() {
        let _guard = init_test_tracing();
        let mut p = profile(dec!(1200000));
        p.deductions.set(DeductionSection::Section80C, dec!(200000));

        let (breakdown, warnings) = assemble(&p, TaxRegime::Old, &test_config());

        assert_eq!(
            breakdown.sections,
            vec![AppliedDeduction {
                section: DeductionSection::Section80C,
                claimed: dec!(200000),
                allowed: dec!(150000),
            }]
        );
        assert_eq!(breakdown.total, dec!(200000));
        assert!(warnings.is_empty());
        // Warning is logged (verified by test_writer capturing output)
    }

    #[test]
    fn claims_below_the_cap_pass_through() {
        let mut p = profile(dec!(1200000));
        p.deductions.set(DeductionSection::Section80C, dec!(100000));
        p.deductions.set(DeductionSection::Section80Tta, dec!(8000));

        let (breakdown, _) = assemble(&p, TaxRegime::Old, &test_config());

        assert_eq!(breakdown.total, dec!(158000));
    }

    #[test]
    fn senior_medical_insurance_cap_is_higher() {
        let _guard = init_test_tracing();
        let mut p = profile(dec!(1200000));
        p.age_category = AgeCategory::Senior;
        p.deductions.set(DeductionSection::Section80D, dec!(60000));

        let (breakdown, warnings) = assemble(&p, TaxRegime::Old, &test_config());

        assert_eq!(
            breakdown.sections,
            vec![AppliedDeduction {
                section: DeductionSection::Section80D,
                claimed: dec!(60000),
                allowed: dec!(50000),
            }]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn employer_nps_is_never_capped() {
        let mut p = profile(dec!(3000000));
        p.deductions
            .set(DeductionSection::Section80Ccd2, dec!(400000));

        for regime in [TaxRegime::Old, TaxRegime::New] {
            let (breakdown, warnings) = assemble(&p, regime, &test_config());
            assert_eq!(breakdown.sections[0].allowed, dec!(400000), "{regime}");
            assert!(warnings.is_empty(), "{regime}");
        }
    }

    #[test]
    fn zero_claims_are_skipped_entirely() {
        let mut p = profile(dec!(800000));
        p.deductions.set(DeductionSection::Section80C, dec!(0));

        let (breakdown, warnings) = assemble(&p, TaxRegime::New, &test_config());

        assert!(breakdown.sections.is_empty());
        assert!(warnings.is_empty());
    }

    // ====== HRA exemption, old regime ======

    fn rent(hra: Decimal, rent: Decimal, city: CityCategory) -> Option<HouseRent> {
        Some(HouseRent {
            hra_received: hra,
            rent_paid: rent,
            city,
        })
    }

    #[test]
    fn hra_exemption_is_the_least_of_the_three_limbs() {
        let mut p = profile(dec!(1000000));
        p.house_rent = rent(dec!(250000), dec!(300000), CityCategory::NonMetro);

        let (breakdown, _) = assemble(&p, TaxRegime::Old, &test_config());

        // rent above a tenth of salary = 300000 - 100000
        assert_eq!(breakdown.hra_exemption, dec!(200000));
    }

    #[test]
    fn metro_salary_share_is_half_instead_of_forty_percent() {
        let mut metro = profile(dec!(1000000));
        metro.house_rent = rent(dec!(520000), dec!(600000), CityCategory::Metro);
        let mut non_metro = profile(dec!(1000000));
        non_metro.house_rent = rent(dec!(520000), dec!(600000), CityCategory::NonMetro);

        let (m, _) = assemble(&metro, TaxRegime::Old, &test_config());
        let (n, _) = assemble(&non_metro, TaxRegime::Old, &test_config());

        assert_eq!(m.hra_exemption, dec!(500000));
        assert_eq!(n.hra_exemption, dec!(400000));
    }

    #[test]
    fn hra_needs_all_three_figures_positive() {
        let config = test_config();

        let mut no_hra = profile(dec!(1000000));
        no_hra.house_rent = rent(dec!(0), dec!(300000), CityCategory::Metro);
        let (breakdown, _) = assemble(&no_hra, TaxRegime::Old, &config);
        assert_eq!(breakdown.hra_exemption, dec!(0));

        let mut no_rent = profile(dec!(1000000));
        no_rent.house_rent = rent(dec!(250000), dec!(0), CityCategory::Metro);
        let (breakdown, _) = assemble(&no_rent, TaxRegime::Old, &config);
        assert_eq!(breakdown.hra_exemption, dec!(0));
    }

    #[test]
    fn cheap_rent_earns_no_exemption() {
        let mut p = profile(dec!(1000000));
        p.house_rent = rent(dec!(250000), dec!(90000), CityCategory::Metro);

        let (breakdown, _) = assemble(&p, TaxRegime::Old, &test_config());

        assert_eq!(breakdown.hra_exemption, dec!(0));
    }

    // ====== new regime screening ======

    #[test]
    fn new_regime_excludes_old_only_claims_with_a_warning() {
        let _guard = init_test_tracing();
        let mut p = profile(dec!(800000));
        p.deductions.set(DeductionSection::Section80C, dec!(100000));

        let (breakdown, warnings) = assemble(&p, TaxRegime::New, &test_config());

        assert!(breakdown.sections.is_empty());
        assert_eq!(breakdown.total, dec!(50000));
        assert_eq!(
            warnings,
            vec![RegimeWarning::DeductionNotAllowed {
                section: DeductionSection::Section80C,
                claimed: dec!(100000),
            }]
        );
        // Warning is logged
    }

    #[test]
    fn new_regime_keeps_employer_nps_alongside_warnings() {
        let _guard = init_test_tracing();
        let mut p = profile(dec!(1500000));
        p.deductions.set(DeductionSection::Section80C, dec!(150000));
        p.deductions.set(DeductionSection::Section80Ccd2, dec!(80000));

        let (breakdown, warnings) = assemble(&p, TaxRegime::New, &test_config());

        assert_eq!(
            breakdown.sections,
            vec![AppliedDeduction {
                section: DeductionSection::Section80Ccd2,
                claimed: dec!(80000),
                allowed: dec!(80000),
            }]
        );
        assert_eq!(breakdown.total, dec!(130000));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn new_regime_flags_hra_figures() {
        let _guard = init_test_tracing();
        let mut p = profile(dec!(1000000));
        p.house_rent = rent(dec!(250000), dec!(300000), CityCategory::Metro);

        let (breakdown, warnings) = assemble(&p, TaxRegime::New, &test_config());

        assert_eq!(breakdown.hra_exemption, dec!(0));
        assert_eq!(
            warnings,
            vec![RegimeWarning::HraNotAllowed {
                hra_received: dec!(250000),
            }]
        );
    }

    #[test]
    fn all_zero_rent_figures_raise_no_warning() {
        let mut p = profile(dec!(1000000));
        p.house_rent = rent(dec!(0), dec!(0), CityCategory::Metro);

        let (_, warnings) = assemble(&p, TaxRegime::New, &test_config());

        assert!(warnings.is_empty());
    }

    // ====== warning text ======

    #[test]
    fn warning_messages_name_the_section_and_amount() {
        let warning = RegimeWarning::DeductionNotAllowed {
            section: DeductionSection::Section80C,
            claimed: dec!(100000),
        };
        assert_eq!(
            warning.message(),
            "section 80C is not deductible under the new regime; ₹1,00,000.00 was ignored"
        );

        let warning = RegimeWarning::HraNotAllowed {
            hra_received: dec!(250000),
        };
        assert_eq!(
            warning.message(),
            "the HRA exemption is not available under the new regime; ₹2,50,000.00 received was ignored"
        );
    }
}
