//! Command-line entry point for the regime navigator.

mod logging;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use navigator_core::calculations::RegimeCalculator;
use navigator_core::guardrails::{self, Screening};
use navigator_core::money::parse_amount;
use navigator_core::provisions::{DEFAULT_TOP_K, ProvisionLibrary};
use navigator_core::{
    AgeCategory, CityCategory, ConfigRegistry, DeductionClaims, FiscalYear, FiscalYearConfig,
    HouseRent, TaxRegime, TaxpayerProfile,
};
use navigator_data::BUILTIN_PROVISIONS;
use rust_decimal::Decimal;

/// Estimate and compare Indian personal income tax under the old and new
/// regimes.
///
/// Slab schedules, deduction ceilings, and levy rates come from builtin
/// data for recent fiscal years, or from a directory of CSV and TOML files
/// passed with --config-dir.
#[derive(Parser, Debug)]
#[command(name = "regime-navigator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory of slab CSVs and levy TOMLs to use instead of the builtin data
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Fiscal year, like 2024-25; the latest loaded year when omitted
    #[arg(long, global = true, value_name = "YEAR")]
    year: Option<String>,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price both regimes and recommend the cheaper one
    Compare(ProfileArgs),

    /// Compute the full liability under one regime
    Compute {
        /// Regime to price: old or new
        #[arg(long)]
        regime: String,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Answer a question from the bundled provisions text
    Explain {
        /// The question, quoted
        question: String,

        /// Number of provision sections to retrieve
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },

    /// List the loaded fiscal years
    Years,
}

#[derive(Args, Debug)]
struct ProfileArgs {
    /// Gross annual income, like 1200000 or ₹12,00,000
    #[arg(long)]
    income: String,

    /// Age in years
    #[arg(long, default_value_t = 30)]
    age: u8,

    /// Deduction claim as SECTION=AMOUNT, repeatable (e.g. 80C=150000)
    #[arg(long = "deduct", value_name = "SECTION=AMOUNT")]
    deduct: Vec<String>,

    /// Annual HRA received; with --rent-paid this prices the HRA exemption
    #[arg(long, value_name = "AMOUNT")]
    hra_received: Option<String>,

    /// Annual rent paid
    #[arg(long, value_name = "AMOUNT")]
    rent_paid: Option<String>,

    /// City category for HRA: metro or non-metro
    #[arg(long, default_value = "non-metro")]
    city: String,
}

impl ProfileArgs {
    fn to_profile(&self) -> Result<TaxpayerProfile> {
        let gross_income = parse_amount(&self.income)
            .with_context(|| format!("invalid income '{}'", self.income))?;

        let mut deductions = DeductionClaims::new();
        for entry in &self.deduct {
            let (section, amount) = DeductionClaims::parse_entry(entry)?;
            deductions.set(section, amount);
        }

        let house_rent = match (&self.hra_received, &self.rent_paid) {
            (None, None) => None,
            (hra, rent) => {
                let city = CityCategory::parse(&self.city).ok_or_else(|| {
                    anyhow!("unknown city category '{}'; use metro or non-metro", self.city)
                })?;
                Some(HouseRent {
                    hra_received: parse_optional_amount(hra.as_deref())?,
                    rent_paid: parse_optional_amount(rent.as_deref())?,
                    city,
                })
            }
        };

        Ok(TaxpayerProfile {
            gross_income,
            age_category: AgeCategory::from_age(self.age),
            deductions,
            house_rent,
        })
    }
}

fn parse_optional_amount(value: Option<&str>) -> Result<Decimal> {
    match value {
        Some(text) => {
            parse_amount(text).with_context(|| format!("invalid amount '{text}'"))
        }
        None => Ok(Decimal::ZERO),
    }
}

fn load_registry(config_dir: Option<&Path>) -> Result<ConfigRegistry> {
    match config_dir {
        Some(dir) => navigator_data::load_dir(dir)
            .with_context(|| format!("failed to load configuration from {}", dir.display())),
        None => navigator_data::builtin_registry().context("builtin configuration failed to load"),
    }
}

fn resolve_config<'a>(
    registry: &'a ConfigRegistry,
    year: Option<&str>,
) -> Result<&'a FiscalYearConfig> {
    match year {
        Some(label) => {
            let year = FiscalYear::parse(label)?;
            Ok(registry.get(year)?)
        }
        None => Ok(registry.latest()?),
    }
}

fn report_notes(notes: &[String]) {
    for note in notes {
        eprintln!("warning: {note}");
    }
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Compare(args) => {
            let registry = load_registry(cli.config_dir.as_deref())?;
            let config = resolve_config(&registry, cli.year.as_deref())?;
            let (profile, notes) = guardrails::sanitize_profile(&args.to_profile()?);
            report_notes(&notes);

            let comparison = RegimeCalculator::new(config).compare(&profile)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                println!("{}", render::comparison_text(&comparison));
            }
        }
        Command::Compute { regime, profile } => {
            let regime = TaxRegime::parse(regime)
                .ok_or_else(|| anyhow!("unknown regime '{regime}'; use old or new"))?;
            let registry = load_registry(cli.config_dir.as_deref())?;
            let config = resolve_config(&registry, cli.year.as_deref())?;
            let (profile, notes) = guardrails::sanitize_profile(&profile.to_profile()?);
            report_notes(&notes);

            let result = RegimeCalculator::new(config).compute(&profile, regime)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", render::computation_text(&result));
            }
        }
        Command::Explain { question, top_k } => {
            let screen = guardrails::QueryScreen::new()
                .context("query screening patterns failed to compile")?;
            match screen.screen(question) {
                Screening::Blocked { message, .. } => {
                    if cli.json {
                        let body = serde_json::json!({ "answer": message });
                        println!("{}", serde_json::to_string_pretty(&body)?);
                    } else {
                        println!("{message}");
                    }
                }
                Screening::Allowed => {
                    let library = ProvisionLibrary::from_markdown(BUILTIN_PROVISIONS);
                    let chunks = library.retrieve(question, *top_k);
                    if cli.json {
                        let body = serde_json::json!({
                            "question": question,
                            "sections": chunks,
                        });
                        println!("{}", serde_json::to_string_pretty(&body)?);
                    } else {
                        println!("{}", library.format_chunks(&chunks));
                        println!();
                        println!("{}", guardrails::DISCLAIMER);
                    }
                }
            }
        }
        Command::Years => {
            let registry = load_registry(cli.config_dir.as_deref())?;
            let years = registry.available_years();
            if cli.json {
                let labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();
                println!("{}", serde_json::to_string_pretty(&labels)?);
            } else {
                println!("{}", render::years_text(&years));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use navigator_core::DeductionSection;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn args(income: &str) -> ProfileArgs {
        ProfileArgs {
            income: income.to_string(),
            age: 30,
            deduct: Vec::new(),
            hra_received: None,
            rent_paid: None,
            city: "non-metro".to_string(),
        }
    }

    #[test]
    fn profile_args_parse_claims_and_grouped_amounts() {
        let mut a = args("₹12,00,000");
        a.deduct = vec!["80C=150000".to_string(), "80d=₹25,000".to_string()];

        let profile = a.to_profile().expect("Failed to build profile");

        assert_eq!(profile.gross_income, dec!(1200000));
        assert_eq!(
            profile.deductions.amount(DeductionSection::Section80C),
            dec!(150000)
        );
        assert_eq!(
            profile.deductions.amount(DeductionSection::Section80D),
            dec!(25000)
        );
        assert_eq!(profile.house_rent, None);
    }

    #[test]
    fn profile_args_map_age_to_a_category() {
        let mut a = args("800000");
        a.age = 65;

        let profile = a.to_profile().expect("Failed to build profile");

        assert_eq!(profile.age_category, AgeCategory::Senior);
    }

    #[test]
    fn hra_fields_build_a_house_rent_block() {
        let mut a = args("800000");
        a.hra_received = Some("240000".to_string());
        a.rent_paid = Some("300000".to_string());
        a.city = "metro".to_string();

        let profile = a.to_profile().expect("Failed to build profile");
        let house_rent = profile.house_rent.expect("HRA fields should be present");

        assert_eq!(house_rent.hra_received, dec!(240000));
        assert_eq!(house_rent.rent_paid, dec!(300000));
        assert_eq!(house_rent.city, CityCategory::Metro);
    }

    #[test]
    fn a_single_hra_field_still_builds_the_block() {
        let mut a = args("800000");
        a.rent_paid = Some("300000".to_string());

        let profile = a.to_profile().expect("Failed to build profile");
        let house_rent = profile.house_rent.expect("HRA fields should be present");

        assert_eq!(house_rent.hra_received, dec!(0));
        assert_eq!(house_rent.rent_paid, dec!(300000));
    }

    #[test]
    fn an_unknown_city_is_rejected() {
        let mut a = args("800000");
        a.hra_received = Some("240000".to_string());
        a.city = "village".to_string();

        let err = a.to_profile().expect_err("city should be rejected");

        assert!(err.to_string().contains("village"));
    }

    #[test]
    fn a_bad_claim_entry_is_rejected() {
        let mut a = args("800000");
        a.deduct = vec!["80C".to_string()];

        assert!(a.to_profile().is_err());
    }
}
