//! Plain-text rendering of computations and comparisons.
//!
//! JSON output serializes the core types directly; everything here is for
//! the human-readable path.

use navigator_core::FiscalYear;
use navigator_core::calculations::{RegimeComparison, TaxComputation};
use navigator_core::guardrails::DISCLAIMER;
use navigator_core::money::format_inr;
use rust_decimal::Decimal;

fn row(label: &str, value: impl AsRef<str>) -> String {
    format!("{:<28}{:>18}", label, value.as_ref())
}

fn rate_label(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::from(100)).normalize())
}

/// One regime's full worksheet as aligned text.
pub fn computation_text(result: &TaxComputation) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} liability for fiscal year {}",
        result.regime.display_name(),
        result.fiscal_year
    ));
    lines.push(String::new());
    lines.push(row("Gross income", format_inr(result.gross_income)));

    let deductions = &result.deductions;
    if deductions.standard_deduction > Decimal::ZERO {
        lines.push(row(
            "  Standard deduction",
            format_inr(deductions.standard_deduction),
        ));
    }
    if deductions.hra_exemption > Decimal::ZERO {
        lines.push(row("  HRA exemption", format_inr(deductions.hra_exemption)));
    }
    for applied in &deductions.sections {
        let label = format!("  Section {}", applied.section);
        if applied.allowed < applied.claimed {
            lines.push(row(
                &label,
                format!(
                    "{} (capped from {})",
                    format_inr(applied.allowed),
                    format_inr(applied.claimed)
                ),
            ));
        } else {
            lines.push(row(&label, format_inr(applied.allowed)));
        }
    }
    lines.push(row("Deductions total", format_inr(deductions.total)));
    lines.push(row("Taxable income", format_inr(result.taxable_income)));
    lines.push(String::new());

    for entry in &result.slab_breakdown {
        lines.push(row(
            &format!(
                "  {} at {}",
                entry.slab.range_label(),
                rate_label(entry.slab.rate)
            ),
            format_inr(entry.tax),
        ));
    }
    lines.push(row("Basic tax", format_inr(result.basic_tax)));
    if result.rebate.applied {
        lines.push(row(
            "Section 87A rebate",
            format!("-{}", format_inr(result.rebate.amount)),
        ));
    }
    if result.surcharge > Decimal::ZERO || result.marginal_relief > Decimal::ZERO {
        lines.push(row("Surcharge", format_inr(result.surcharge)));
    }
    if result.marginal_relief > Decimal::ZERO {
        lines.push(row("Marginal relief", format_inr(result.marginal_relief)));
    }
    lines.push(row("Health and education cess", format_inr(result.cess)));
    lines.push(row("Total payable", format_inr(result.total_payable)));

    if !result.warnings.is_empty() {
        lines.push(String::new());
        for warning in &result.warnings {
            lines.push(format!("note: {}", warning.message()));
        }
    }

    lines.push(String::new());
    lines.push(DISCLAIMER.to_string());
    lines.join("\n")
}

/// Both regimes side by side with the recommendation and savings pointers.
pub fn comparison_text(comparison: &RegimeComparison) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Regime comparison for fiscal year {}",
        comparison.old_regime.fiscal_year
    ));
    lines.push(String::new());
    lines.push(row(
        "Old regime total",
        format_inr(comparison.old_regime.total_payable),
    ));
    lines.push(row(
        "New regime total",
        format_inr(comparison.new_regime.total_payable),
    ));
    lines.push(String::new());
    if comparison.tax_saved.is_zero() {
        lines.push(format!(
            "Both regimes cost the same; the {} keeps more deductions open.",
            comparison.recommended.display_name()
        ));
    } else {
        lines.push(format!(
            "The {} saves {}.",
            comparison.recommended.display_name(),
            format_inr(comparison.tax_saved)
        ));
    }
    for warning in &comparison.new_regime.warnings {
        lines.push(format!("note: {}", warning.message()));
    }

    if !comparison.suggestions.is_empty() {
        lines.push(String::new());
        lines.push("Worth a look:".to_string());
        for suggestion in &comparison.suggestions {
            lines.push(format!("  - {suggestion}"));
        }
    }

    lines.push(String::new());
    lines.push(DISCLAIMER.to_string());
    lines.join("\n")
}

/// The loaded fiscal years with their assessment year labels.
pub fn years_text(years: &[FiscalYear]) -> String {
    let mut lines = vec!["Loaded fiscal years:".to_string()];
    for year in years {
        lines.push(format!(
            "  {} (assessment year {})",
            year,
            year.assessment_year_label()
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use navigator_core::calculations::RegimeCalculator;
    use navigator_core::{
        AgeCategory, DeductionCaps, DeductionClaims, FiscalYearConfig, IncomeSlab,
        MedicalInsuranceCaps, RegimeRules, SlabSchedule, SurchargeSchedule, TaxRegime,
        TaxpayerProfile,
    };
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn flat_rules(standard_deduction: rust_decimal::Decimal) -> RegimeRules {
        let slabs = SlabSchedule::new(vec![IncomeSlab {
            lower_bound: dec!(0),
            upper_bound: None,
            rate: dec!(0.10),
        }])
        .expect("Failed to build schedule");
        RegimeRules {
            slabs,
            standard_deduction,
            rebate_threshold: dec!(0),
            surcharge: SurchargeSchedule::default(),
        }
    }

    fn test_config() -> FiscalYearConfig {
        FiscalYearConfig {
            fiscal_year: FiscalYear(2024),
            old_regime: flat_rules(dec!(50000)),
            new_regime: flat_rules(dec!(100000)),
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

    fn test_profile() -> TaxpayerProfile {
        TaxpayerProfile {
            gross_income: dec!(150000),
            age_category: AgeCategory::Normal,
            deductions: DeductionClaims::new(),
            house_rent: None,
        }
    }

    #[test]
    fn computation_text_carries_the_worksheet_lines() {
        let config = test_config();
        let result = RegimeCalculator::new(&config)
            .compute(&test_profile(), TaxRegime::Old)
            .expect("Failed to compute");

        let text = computation_text(&result);

        assert!(text.starts_with("Old Regime liability for fiscal year 2024-25"));
        assert!(text.contains("Standard deduction"));
        assert!(text.contains("₹50,000.00"));
        assert!(text.contains("at 10%"));
        assert!(text.contains("Total payable"));
        assert!(text.contains("₹10,400.00"));
        assert!(text.contains("educational and general guidance only"));
    }

    #[test]
    fn comparison_text_names_the_cheaper_regime() {
        let config = test_config();
        let comparison = RegimeCalculator::new(&config)
            .compare(&test_profile())
            .expect("Failed to compare");

        let text = comparison_text(&comparison);

        assert!(text.contains("Old regime total"));
        assert!(text.contains("₹10,400.00"));
        assert!(text.contains("₹5,200.00"));
        assert!(text.contains("The New Regime saves ₹5,200.00."));
    }

    #[test]
    fn comparison_text_reports_a_tie_plainly() {
        let mut config = test_config();
        config.new_regime = flat_rules(dec!(50000));
        let comparison = RegimeCalculator::new(&config)
            .compare(&test_profile())
            .expect("Failed to compare");

        let text = comparison_text(&comparison);

        assert_eq!(comparison.recommended, TaxRegime::Old);
        assert!(text.contains("Both regimes cost the same"));
    }

    #[test]
    fn years_text_lists_assessment_years() {
        let text = years_text(&[FiscalYear(2023), FiscalYear(2024)]);

        assert_eq!(
            text,
            "Loaded fiscal years:\n  2023-24 (assessment year 2024-25)\n  2024-25 (assessment year 2025-26)"
        );
    }
}
