//! Fiscal-year configuration data for the regime navigator.
//!
//! Two file formats feed the [`ConfigRegistry`]:
//!
//! * slab schedule CSVs, one row per slab ([`schedule`])
//! * levy TOMLs, one file per fiscal year ([`levies`])
//!
//! The crate embeds a builtin data set for recent fiscal years and can load
//! the same formats from a directory at runtime, so updated rates never
//! require a rebuild.

pub mod levies;
pub mod schedule;

use std::fs;
use std::path::{Path, PathBuf};

use navigator_core::{ConfigRegistry, RegistryError};
use thiserror::Error;
use tracing::info;

pub use levies::{LevyError, LevyFile, RegimeLevies};
pub use schedule::{ScheduleError, SlabRecord, SlabScheduleLoader};

/// Builtin slab schedules for the embedded fiscal years.
pub const BUILTIN_SLABS_CSV: &str = include_str!("../assets/slabs.csv");

/// Builtin levy files, one per embedded fiscal year.
pub const BUILTIN_LEVY_FILES: [&str; 2] = [
    include_str!("../assets/fy2023-24.toml"),
    include_str!("../assets/fy2024-25.toml"),
];

/// Reference text on the statutory provisions the calculator models.
pub const BUILTIN_PROVISIONS: &str = include_str!("../assets/official_provisions.md");

/// Errors raised while loading configuration data.
#[derive(Debug, Error)]
pub enum DataError {
    /// A file or directory could not be read.
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory held no levy TOML files.
    #[error("no levy TOML files found in {0}")]
    NoLevyFiles(PathBuf),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Levy(#[from] LevyError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Builds a registry from the embedded data set.
pub fn builtin_registry() -> Result<ConfigRegistry, DataError> {
    let records = SlabScheduleLoader::parse(BUILTIN_SLABS_CSV.as_bytes())?;
    let schedules = SlabScheduleLoader::build(&records)?;

    let mut registry = ConfigRegistry::new();
    for text in BUILTIN_LEVY_FILES {
        let levy = LevyFile::parse(text)?;
        registry.insert(levy.into_config(&schedules)?)?;
    }
    Ok(registry)
}

/// Builds a registry from the `*.csv` slab schedules and `*.toml` levy files
/// in a directory.
///
/// All CSVs are merged into one pool of slab rows before the levy files are
/// resolved against them, so a year's slabs may be split across files.
/// Files are visited in path order.
pub fn load_dir(dir: &Path) -> Result<ConfigRegistry, DataError> {
    let mut csv_paths = Vec::new();
    let mut toml_paths = Vec::new();

    let entries = fs::read_dir(dir).map_err(|source| DataError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| DataError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => csv_paths.push(path),
            Some("toml") => toml_paths.push(path),
            _ => {}
        }
    }
    csv_paths.sort();
    toml_paths.sort();

    if toml_paths.is_empty() {
        return Err(DataError::NoLevyFiles(dir.to_path_buf()));
    }

    let mut records = Vec::new();
    for path in &csv_paths {
        let text = read(path)?;
        records.extend(SlabScheduleLoader::parse(text.as_bytes())?);
    }
    let schedules = SlabScheduleLoader::build(&records)?;

    let mut registry = ConfigRegistry::new();
    for path in &toml_paths {
        let text = read(path)?;
        let levy = LevyFile::parse(&text)?;
        registry.insert(levy.into_config(&schedules)?)?;
        info!(path = %path.display(), "loaded levy file");
    }
    Ok(registry)
}

fn read(path: &Path) -> Result<String, DataError> {
    fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use navigator_core::FiscalYear;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_builtin_registry_covers_both_years() {
        let registry = builtin_registry().expect("Failed to build builtin registry");

        assert_eq!(
            registry.available_years(),
            vec![FiscalYear(2023), FiscalYear(2024)]
        );
        assert_eq!(
            registry.latest().expect("Failed to pick latest year").fiscal_year,
            FiscalYear(2024)
        );
    }

    #[test]
    fn test_builtin_provisions_are_embedded() {
        assert!(BUILTIN_PROVISIONS.contains("## Section 87A Rebate"));
    }
}
