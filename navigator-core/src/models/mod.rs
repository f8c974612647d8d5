mod age_category;
mod config;
mod deduction;
mod fiscal_year;
mod profile;
mod regime;
mod slab;

pub use age_category::AgeCategory;
pub use config::{
    ConfigError, DeductionCaps, FiscalYearConfig, MedicalInsuranceCaps, RegimeRules,
    SurchargeSchedule, SurchargeTier,
};
pub use deduction::{ClaimParseError, DeductionClaims, DeductionSection};
pub use fiscal_year::{FiscalYear, ParseFiscalYearError};
pub use profile::{CityCategory, HouseRent, TaxpayerProfile};
pub use regime::TaxRegime;
pub use slab::{IncomeSlab, SlabSchedule, SlabScheduleError};
