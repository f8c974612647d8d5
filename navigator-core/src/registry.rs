//! Lookup of fiscal-year configurations by year.
//!
//! Data files register one [`FiscalYearConfig`] per fiscal year; calculators
//! fetch the year they need. A miss reports what was asked for and what is
//! actually loaded, so a typo in a year is obvious from the error alone.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::models::{ConfigError, FiscalYear, FiscalYearConfig};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error(
        "no configuration for fiscal year {requested}; available: {}",
        .available.iter().map(|y| y.to_string()).collect::<Vec<_>>().join(", ")
    )]
    MissingYear {
        requested: FiscalYear,
        available: Vec<FiscalYear>,
    },
    #[error("configuration for fiscal year {year} failed validation")]
    InvalidConfig {
        year: FiscalYear,
        #[source]
        source: ConfigError,
    },
    #[error("no fiscal year configurations are loaded")]
    Empty,
}

#[derive(Debug, Default)]
pub struct ConfigRegistry {
    years: HashMap<FiscalYear, FiscalYearConfig>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a year's configuration, replacing any earlier
    /// registration for the same year.
    pub fn insert(&mut self, config: FiscalYearConfig) -> Result<(), RegistryError> {
        config
            .validate()
            .map_err(|source| RegistryError::InvalidConfig {
                year: config.fiscal_year,
                source,
            })?;
        debug!(year = %config.fiscal_year, "registered fiscal year configuration");
        self.years.insert(config.fiscal_year, config);
        Ok(())
    }

    pub fn get(&self, year: FiscalYear) -> Result<&FiscalYearConfig, RegistryError> {
        self.years
            .get(&year)
            .ok_or_else(|| RegistryError::MissingYear {
                requested: year,
                available: self.available_years(),
            })
    }

    /// The most recent loaded fiscal year.
    pub fn latest(&self) -> Result<&FiscalYearConfig, RegistryError> {
        let year = self
            .years
            .keys()
            .copied()
            .max()
            .ok_or(RegistryError::Empty)?;
        self.get(year)
    }

    /// Registered years in ascending order.
    pub fn available_years(&self) -> Vec<FiscalYear> {
        let mut years: Vec<FiscalYear> = self.years.keys().copied().collect();
        years.sort_unstable();
        years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}
