//! CSV dataset sources.
//!
//! A source identifier `Iris` resolves to `<data_dir>/Iris.csv`. The first
//! row is the header; every following row is one record. Cells matching one
//! of [`MISSING_VALUE_SENTINELS`] are read as missing.

use crate::core::constants::{MISSING_VALUE_SENTINELS, TABLE_EXTENSION};
use crate::core::error::{FixtureError, Result};
use crate::core::types::ColumnSemantic;
use crate::dataset::table::{Column, Table};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// CSV-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvConfig {
    /// Field delimiter
    pub delimiter: char,
    /// Quote character
    pub quote_char: char,
    /// Trim whitespace from fields
    pub trim: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        CsvConfig {
            delimiter: ',',
            quote_char: '"',
            trim: true,
        }
    }
}

/// Loads named dataset sources from a directory of CSV files.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    data_dir: PathBuf,
    csv_config: CsvConfig,
}

impl DatasetLoader {
    /// Create a loader reading from `data_dir`.
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        DatasetLoader {
            data_dir: data_dir.into(),
            csv_config: CsvConfig::default(),
        }
    }

    /// Replace the CSV dialect.
    pub fn with_csv_config(mut self, csv_config: CsvConfig) -> Self {
        self.csv_config = csv_config;
        self
    }

    /// Set delimiter character
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.csv_config.delimiter = delimiter;
        self
    }

    /// Directory sources are read from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path a source identifier resolves to.
    pub fn source_path(&self, source: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", source, TABLE_EXTENSION))
    }

    /// Load a source and tag `categorical` columns.
    pub fn load(&self, source: &str, categorical: &[String]) -> Result<Table> {
        let path = self.source_path(source);
        let mut table = self.load_csv(&path)?;

        for name in categorical {
            let column = table.column_mut(name).ok_or_else(|| {
                FixtureError::data_source(format!(
                    "categorical column {} is absent from {}",
                    name,
                    path.display()
                ))
            })?;
            column.set_semantic(ColumnSemantic::Categorical);
        }

        Ok(table)
    }

    /// Read one CSV file into a [`Table`].
    pub fn load_csv<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        log::info!("Loading CSV file: {}", path.display());

        if !path.is_file() {
            return Err(FixtureError::data_source(format!(
                "Dataset source does not exist: {}",
                path.display()
            )));
        }

        let file = File::open(path).map_err(|e| {
            FixtureError::data_source(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let trim = if self.csv_config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        };
        let mut reader = ReaderBuilder::new()
            .delimiter(self.csv_config.delimiter as u8)
            .quote(self.csv_config.quote_char as u8)
            .has_headers(true)
            .flexible(false)
            .trim(trim)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| malformed(path, e))?
            .clone();
        if headers.is_empty() {
            return Err(FixtureError::data_source(format!(
                "{} has no header row",
                path.display()
            )));
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        let mut record = StringRecord::new();
        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {
                    for (column, value) in cells.iter_mut().zip(record.iter()) {
                        column.push(parse_cell(value));
                    }
                }
                Ok(false) => break,
                Err(e) => return Err(malformed(path, e)),
            }
        }

        let columns = headers
            .iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, values))
            .collect();
        let table = Table::new(columns).map_err(|e| malformed(path, e))?;

        log::info!(
            "Loaded {} rows with {} columns",
            table.num_rows(),
            table.num_columns()
        );
        Ok(table)
    }
}

fn parse_cell(value: &str) -> Option<String> {
    if MISSING_VALUE_SENTINELS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

fn malformed<E: std::fmt::Display>(path: &Path, error: E) -> FixtureError {
    FixtureError::data_source(format!("Malformed CSV {}: {}", path.display(), error))
}
