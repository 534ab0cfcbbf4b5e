//! Fixed tokens and defaults shared across the fixture pipeline.
//!
//! Artifact names and file layout are consumed by an external conformance
//! suite, so everything here is part of the on-disk contract.

/// Cell values that the loader reads as missing.
pub const MISSING_VALUE_SENTINELS: [&str; 4] = ["", "N/A", "NA", "NaN"];

/// Token written for missing cells when a table is stored.
pub const MISSING_VALUE_TOKEN: &str = "N/A";

/// Dataset name suffix marking a variant of a base dataset with injected
/// missing values.
pub const MISSING_VALUES_MARKER: &str = "NA";

/// Separator between an artifact name and its truncation iteration.
pub const TRUNCATION_SEPARATOR: char = '@';

/// Name of the first prediction table column.
pub const TARGET_COLUMN: &str = "_target";

/// Extension of dataset sources and prediction tables.
pub const TABLE_EXTENSION: &str = "csv";

/// Extension of serialized model artifacts.
pub const MODEL_EXTENSION: &str = "txt";

/// Default directory holding dataset sources.
pub const DEFAULT_DATA_DIR: &str = "csv";

/// Default directory receiving serialized models.
pub const DEFAULT_MODEL_DIR: &str = "lgbm";

/// Default directory receiving prediction tables.
pub const DEFAULT_TABLE_DIR: &str = "csv";

/// Environment variable overriding the dataset directory.
pub const ENV_DATA_DIR: &str = "LGBM_FIXTURES_DATA_DIR";

/// Environment variable overriding the model directory.
pub const ENV_MODEL_DIR: &str = "LGBM_FIXTURES_MODEL_DIR";

/// Environment variable overriding the prediction table directory.
pub const ENV_TABLE_DIR: &str = "LGBM_FIXTURES_TABLE_DIR";

/// Fraction of rows blanked per column when deriving a missing-value dataset.
pub const DEFAULT_MISSING_FRACTION: f64 = 0.2;

/// Seed used when deriving missing-value datasets.
pub const DEFAULT_MISSING_SEED: u64 = 42;

/// Crate version string.
pub const LGBM_FIXTURES_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_cover_written_token() {
        assert!(MISSING_VALUE_SENTINELS.contains(&MISSING_VALUE_TOKEN));
    }

    #[test]
    fn test_version_constants() {
        assert!(!LGBM_FIXTURES_VERSION.is_empty());
    }
}
