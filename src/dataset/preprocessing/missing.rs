//! Missing-value dataset derivation.
//!
//! The `*NA` datasets are copies of a base dataset with a fixed share of the
//! cells in selected columns blanked out. Row selection comes from a seeded
//! generator so the derived file is identical on every run.

use crate::core::constants::{DEFAULT_MISSING_FRACTION, DEFAULT_MISSING_SEED};
use crate::core::error::{FixtureError, Result};
use crate::dataset::loader::DatasetLoader;
use crate::dataset::table::Table;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Missing value injection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueConfig {
    /// Fraction of rows blanked in each selected column
    pub fraction: f64,
    /// Random seed for row selection
    pub seed: u64,
}

impl Default for MissingValueConfig {
    fn default() -> Self {
        MissingValueConfig {
            fraction: DEFAULT_MISSING_FRACTION,
            seed: DEFAULT_MISSING_SEED,
        }
    }
}

impl MissingValueConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fraction) {
            return Err(FixtureError::invalid_parameter(
                "fraction",
                self.fraction.to_string(),
                "must be in range [0.0, 1.0]",
            ));
        }
        Ok(())
    }
}

/// Blank `round(fraction * rows)` distinct rows in each of `columns`.
///
/// Columns are processed in the given order from a single generator, so the
/// result depends on that order as well as on the seed.
pub fn inject_missing(
    table: &Table,
    columns: &[String],
    config: &MissingValueConfig,
) -> Result<Table> {
    config.validate()?;

    let num_rows = table.num_rows();
    let count = (config.fraction * num_rows as f64).round() as usize;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut derived = table.clone();

    for name in columns {
        let column = derived
            .column_mut(name)
            .ok_or_else(|| FixtureError::schema(format!("column {} is absent", name)))?;

        for row in index::sample(&mut rng, num_rows, count.min(num_rows)) {
            column.clear(row);
        }
        log::debug!("Blanked {} of {} rows in {}", count, num_rows, name);
    }

    Ok(derived)
}

/// Derive `<target>.csv` from `<source>.csv` in the loader's data directory.
///
/// Returns the path of the written file.
pub fn derive_missing_dataset(
    loader: &DatasetLoader,
    source: &str,
    target: &str,
    columns: &[String],
    config: &MissingValueConfig,
) -> Result<PathBuf> {
    let table = loader.load(source, &[])?;
    let derived = inject_missing(&table, columns, config)?;

    let path = loader.source_path(target);
    derived.write_csv(&path)?;

    log::info!("Derived {} from {} ({} columns)", target, source, columns.len());
    Ok(path)
}
