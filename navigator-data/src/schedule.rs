//! CSV slab schedule loading.
//!
//! Slab schedules are published per fiscal year and regime as flat CSV rows.
//! This module parses those rows and assembles them into validated
//! [`SlabSchedule`]s keyed by `(FiscalYear, TaxRegime)`.

use std::collections::HashMap;
use std::io::Read;

use navigator_core::{
    FiscalYear, IncomeSlab, ParseFiscalYearError, SlabSchedule, SlabScheduleError, TaxRegime,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

/// A single row of a slab schedule CSV file.
///
/// Expected header:
///
/// ```csv
/// fiscal_year,regime,lower_bound,upper_bound,rate
/// ```
///
/// `upper_bound` is left empty for the open-ended top slab.
#[derive(Debug, Clone, Deserialize)]
pub struct SlabRecord {
    pub fiscal_year: String,
    pub regime: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

/// Deserializes a decimal CSV field, treating an empty string as `None`.
fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Errors produced while parsing or assembling slab schedules.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The CSV itself could not be read or parsed.
    #[error("failed to parse slab CSV: {0}")]
    CsvParse(String),

    /// A row named a regime other than `old` or `new`.
    #[error("unknown regime '{0}' in slab CSV")]
    UnknownRegime(String),

    /// A row carried a fiscal year label that does not parse.
    #[error(transparent)]
    InvalidFiscalYear(#[from] ParseFiscalYearError),

    /// The assembled slabs for one year and regime failed validation.
    #[error("invalid slab schedule for {year} ({regime}): {source}")]
    InvalidSchedule {
        year: FiscalYear,
        regime: TaxRegime,
        #[source]
        source: SlabScheduleError,
    },
}

impl From<csv::Error> for ScheduleError {
    fn from(err: csv::Error) -> Self {
        ScheduleError::CsvParse(err.to_string())
    }
}

/// Parses and assembles slab schedule CSV files.
pub struct SlabScheduleLoader;

impl SlabScheduleLoader {
    /// Parses slab rows from any reader over CSV text.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SlabRecord>, ScheduleError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for row in csv_reader.deserialize() {
            let record: SlabRecord = row?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups parsed rows by fiscal year and regime and validates each group
    /// as a contiguous [`SlabSchedule`].
    ///
    /// Rows may appear in any order; each group is sorted by `lower_bound`
    /// before validation.
    pub fn build(
        records: &[SlabRecord],
    ) -> Result<HashMap<(FiscalYear, TaxRegime), SlabSchedule>, ScheduleError> {
        let mut grouped: HashMap<(FiscalYear, TaxRegime), Vec<IncomeSlab>> = HashMap::new();

        for record in records {
            let year = FiscalYear::parse(&record.fiscal_year)?;
            let regime = TaxRegime::parse(&record.regime)
                .ok_or_else(|| ScheduleError::UnknownRegime(record.regime.clone()))?;
            grouped.entry((year, regime)).or_default().push(IncomeSlab {
                lower_bound: record.lower_bound,
                upper_bound: record.upper_bound,
                rate: record.rate,
            });
        }

        let mut schedules = HashMap::new();
        for ((year, regime), mut slabs) in grouped {
            slabs.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
            let schedule = SlabSchedule::new(slabs).map_err(|source| {
                ScheduleError::InvalidSchedule {
                    year,
                    regime,
                    source,
                }
            })?;
            debug!(
                year = %year,
                regime = %regime,
                slabs = schedule.slabs().len(),
                "assembled slab schedule"
            );
            schedules.insert((year, regime), schedule);
        }

        Ok(schedules)
    }
}
