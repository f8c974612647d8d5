//! Guardrails in front of the calculator and the provision lookup.
//!
//! Profile figures are clamped to sane ranges before any calculation, and
//! free-text questions are screened for evasion intent or plainly off-topic
//! asks before a provision lookup runs. Screening is plain pattern matching;
//! a blocked question never reaches the retrieval layer.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{DeductionSection, TaxpayerProfile};
use crate::money::format_inr_whole;

/// Upper bound on gross income this calculator will price.
pub const MAX_GROSS_INCOME: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Shown alongside every report and explanation.
pub const DISCLAIMER: &str = "This tool is for educational and general guidance only. It is not \
a substitute for professional tax advice. Always refer to the Income Tax Act, Finance Act, and \
official CBDT/Income Tax Portal for authoritative provisions. Consult a qualified CA for your \
specific situation.";

const EMPTY_RESPONSE: &str = "Please enter a question related to Indian income tax.";

const ILLEGAL_RESPONSE: &str = "I can't answer this. Tax evasion, fraud, and document \
falsification are serious offences under the Income Tax Act and can result in penalties, \
prosecution, and imprisonment. I can only help with legitimate tax regime rules: old vs new \
regime, deductions, exemptions, and compliance. Ask about legal tax-saving options or a regime \
comparison instead.";

const OFF_TOPIC_RESPONSE: &str = "I can only help with Indian income tax questions: old vs new \
regime, deductions, exemptions, eligibility, and compliance. Please ask something related to \
income tax.";

/// Requests with evasion or falsification intent. Matched case-insensitively
/// anywhere in the question.
const ILLEGAL_PATTERNS: &[&str] = &[
    r"(?i)\b(evade|evasion|evading)\s+(tax|taxes)\b",
    r"(?i)\bhide\s+(income|money|salary|freelance)\b",
    r"(?i)\bhide\s+.*\s+from\s+(IT|income\s+tax|department)\b",
    r"(?i)\b(black\s+money|unaccounted)\b",
    r"(?i)\bfake\s+(invoice|bill|receipt|hra|proof)\b",
    r"(?i)\b(conceal|hide)\s+income\b",
    r"(?i)\bunderreport(ing)?\s+income\b",
    r"(?i)\bhow\s+to\s+(avoid|escape)\s+pay(ing)?\s+tax\b",
    r"(?i)\bavoid\s+paying\s+tax\b",
    r"(?i)\bavoid\s+paying\s+tax\s+.*without\s+showing\b",
    r"(?i)\b(split|transfer)\s+income\s+(across|to|with)\s+family\b",
    r"(?i)\bsplit\s+.*income.*reduce\s+tax\b",
    r"(?i)\bfake\s+HRA\s+proof\b",
    r"(?i)\bhow\s+to\s+avoid\s+TDS\b",
    r"(?i)\bavoid\s+TDS\b",
    r"(?i)\bbribe\b",
    r"(?i)\bmoney\s+launder(ing)?\b",
];

/// Plainly unrelated asks the explain path refuses outright.
const OFF_TOPIC_PATTERNS: &[&str] = &[
    r"(?i)^(what('s|s)\s+the\s+weather|tell\s+me\s+a\s+joke)",
    r"(?i)\b(kill|suicide|self\s*harm)\b",
    r"(?i)\b(recipe|cooking|food)\b",
    r"(?i)\b(sports|football|cricket)\b",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Empty,
    IllegalIntent,
    OffTopic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screening {
    Allowed,
    Blocked {
        reason: BlockReason,
        message: &'static str,
    },
}

/// Compiled question screen.
#[derive(Debug)]
pub struct QueryScreen {
    illegal: regex::RegexSet,
    off_topic: regex::RegexSet,
}

impl QueryScreen {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            illegal: regex::RegexSet::new(ILLEGAL_PATTERNS)?,
            off_topic: regex::RegexSet::new(OFF_TOPIC_PATTERNS)?,
        })
    }

    /// Screens a question, returning the canned refusal when it is blocked.
    pub fn screen(&self, query: &str) -> Screening {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Screening::Blocked {
                reason: BlockReason::Empty,
                message: EMPTY_RESPONSE,
            };
        }
        if self.illegal.is_match(trimmed) {
            warn!(query = trimmed, "blocked a question with evasion intent");
            return Screening::Blocked {
                reason: BlockReason::IllegalIntent,
                message: ILLEGAL_RESPONSE,
            };
        }
        if self.off_topic.is_match(trimmed) {
            debug!(query = trimmed, "blocked an off-topic question");
            return Screening::Blocked {
                reason: BlockReason::OffTopic,
                message: OFF_TOPIC_RESPONSE,
            };
        }
        Screening::Allowed
    }
}

/// Clamps profile figures to ranges the calculator is built for.
///
/// Returns the adjusted profile and one plain-language warning per
/// adjustment. The strict path is [`crate::calculations::RegimeCalculator`],
/// which rejects rather than repairs; this is the forgiving front door for
/// interactive input.
pub fn sanitize_profile(profile: &TaxpayerProfile) -> (TaxpayerProfile, Vec<String>) {
    let mut out = profile.clone();
    let mut warnings = Vec::new();

    if out.gross_income < Decimal::ZERO {
        warnings.push("Gross income was negative; treated as 0.".to_string());
        out.gross_income = Decimal::ZERO;
    }
    if out.gross_income > MAX_GROSS_INCOME {
        warnings.push(format!(
            "Gross income capped at {} for this calculator.",
            format_inr_whole(MAX_GROSS_INCOME)
        ));
        out.gross_income = MAX_GROSS_INCOME;
    }

    let negative_claims: Vec<DeductionSection> = out
        .deductions
        .iter()
        .filter(|(_, amount)| *amount < Decimal::ZERO)
        .map(|(section, _)| section)
        .collect();
    for section in negative_claims {
        warnings.push(format!("Claim under {section} was negative; treated as 0."));
        out.deductions.set(section, Decimal::ZERO);
    }

    if let Some(house_rent) = &mut out.house_rent {
        if house_rent.hra_received < Decimal::ZERO {
            warnings.push("HRA received was negative; treated as 0.".to_string());
            house_rent.hra_received = Decimal::ZERO;
        }
        if house_rent.rent_paid < Decimal::ZERO {
            warnings.push("Rent paid was negative; treated as 0.".to_string());
            house_rent.rent_paid = Decimal::ZERO;
        }
    }

    (out, warnings)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{AgeCategory, CityCategory, DeductionClaims, HouseRent};

    fn profile(gross: Decimal) -> TaxpayerProfile {
        TaxpayerProfile {
            gross_income: gross,
            age_category: AgeCategory::Normal,
            deductions: DeductionClaims::new(),
            house_rent: None,
        }
    }

    // ====== sanitize_profile ======

    #[test]
    fn a_clean_profile_passes_untouched() {
        let mut p = profile(dec!(800000));
        p.deductions.set(DeductionSection::Section80C, dec!(150000));

        let (sanitized, warnings) = sanitize_profile(&p);

        assert_eq!(sanitized, p);
        assert!(warnings.is_empty());
    }

    #[test]
    fn negative_income_is_zeroed_with_a_warning() {
        let (sanitized, warnings) = sanitize_profile(&profile(dec!(-50000)));

        assert_eq!(sanitized.gross_income, dec!(0));
        assert_eq!(warnings, vec!["Gross income was negative; treated as 0."]);
    }

    #[test]
    fn income_is_capped_at_ten_crore() {
        let (sanitized, warnings) = sanitize_profile(&profile(dec!(250000000)));

        assert_eq!(sanitized.gross_income, dec!(100000000));
        assert_eq!(
            warnings,
            vec!["Gross income capped at ₹10,00,00,000 for this calculator."]
        );
    }

    #[test]
    fn negative_claims_are_zeroed_per_section() {
        let mut p = profile(dec!(800000));
        p.deductions.set(DeductionSection::Section80C, dec!(-5000));
        p.deductions.set(DeductionSection::Section80D, dec!(20000));

        let (sanitized, warnings) = sanitize_profile(&p);

        assert_eq!(sanitized.deductions.amount(DeductionSection::Section80C), dec!(0));
        assert_eq!(
            sanitized.deductions.amount(DeductionSection::Section80D),
            dec!(20000)
        );
        assert_eq!(warnings, vec!["Claim under 80C was negative; treated as 0."]);
    }

    #[test]
    fn negative_rent_figures_are_zeroed() {
        let mut p = profile(dec!(800000));
        p.house_rent = Some(HouseRent {
            hra_received: dec!(-1),
            rent_paid: dec!(-240000),
            city: CityCategory::Metro,
        });

        let (sanitized, warnings) = sanitize_profile(&p);

        let house_rent = sanitized.house_rent.unwrap();
        assert_eq!(house_rent.hra_received, dec!(0));
        assert_eq!(house_rent.rent_paid, dec!(0));
        assert_eq!(warnings.len(), 2);
    }

    // ====== query screening ======

    fn screen(query: &str) -> Screening {
        QueryScreen::new().unwrap().screen(query)
    }

    fn reason(screening: &Screening) -> Option<BlockReason> {
        match screening {
            Screening::Allowed => None,
            Screening::Blocked { reason, .. } => Some(*reason),
        }
    }

    #[test]
    fn blank_questions_are_turned_away() {
        assert_eq!(reason(&screen("")), Some(BlockReason::Empty));
        assert_eq!(reason(&screen("   ")), Some(BlockReason::Empty));
    }

    #[test]
    fn evasion_intent_is_blocked() {
        for query in [
            "How do I evade tax on my salary?",
            "can i hide income from the department",
            "best way to get a fake invoice for claims",
            "how to avoid TDS on interest",
        ] {
            assert_eq!(
                reason(&screen(query)),
                Some(BlockReason::IllegalIntent),
                "{query:?}",
            );
        }
    }

    #[test]
    fn off_topic_questions_are_blocked() {
        for query in [
            "tell me a joke",
            "What's the weather in Mumbai?",
            "share a recipe for dinner",
            "who won the cricket match",
        ] {
            assert_eq!(reason(&screen(query)), Some(BlockReason::OffTopic), "{query:?}");
        }
    }

    #[test]
    fn legitimate_tax_questions_pass() {
        for query in [
            "Which regime is better for a 12 lakh income?",
            "What deductions can I claim in the new regime?",
            "How does the 87A rebate work?",
            "Explain the HRA exemption rules",
        ] {
            assert_eq!(reason(&screen(query)), None, "{query:?}");
        }
    }

    #[test]
    fn refusals_carry_a_usable_message() {
        let Screening::Blocked { message, .. } = screen("how to evade taxes") else {
            panic!("expected a block");
        };
        assert!(message.contains("Income Tax Act"), "{message}");
    }
}
