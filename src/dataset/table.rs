//! In-memory tabular dataset.
//!
//! Cells are kept as their source text, with missing cells as `None`. Typing
//! happens at split time, where the task decides whether a column is a
//! number, a category code or a one-hot block.

use crate::core::constants::MISSING_VALUE_TOKEN;
use crate::core::error::{FixtureError, Result};
use crate::core::types::ColumnSemantic;
use crate::io::artifact::write_atomic;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;

/// One named column of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    semantic: ColumnSemantic,
    values: Vec<Option<String>>,
}

impl Column {
    /// Create a continuous column.
    pub fn new<S: Into<String>>(name: S, values: Vec<Option<String>>) -> Self {
        Column {
            name: name.into(),
            semantic: ColumnSemantic::Continuous,
            values,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic tag.
    pub fn semantic(&self) -> ColumnSemantic {
        self.semantic
    }

    /// Whether the column is tagged categorical.
    pub fn is_categorical(&self) -> bool {
        self.semantic == ColumnSemantic::Categorical
    }

    /// Raw cell values.
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing cells.
    pub fn num_missing(&self) -> usize {
        self.values.iter().filter(|value| value.is_none()).count()
    }

    /// Parse every cell as a number; missing cells become NaN.
    pub fn numeric_values(&self) -> Result<Vec<f64>> {
        self.values
            .iter()
            .enumerate()
            .map(|(row, value)| match value {
                None => Ok(f64::NAN),
                Some(text) => text.parse::<f64>().map_err(|_| {
                    FixtureError::schema(format!(
                        "column {} is not numeric: {:?} at row {}",
                        self.name, text, row
                    ))
                }),
            })
            .collect()
    }

    /// Distinct non-missing values in category order.
    ///
    /// Levels that all parse as numbers sort numerically, anything else
    /// sorts lexicographically.
    pub fn levels(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self.values.iter().flatten().map(String::as_str).collect();
        let mut levels: Vec<String> = distinct.into_iter().map(str::to_string).collect();

        let numeric: Option<Vec<f64>> =
            levels.iter().map(|level| level.parse::<f64>().ok()).collect();
        if let Some(keys) = numeric {
            let mut keyed: Vec<(f64, String)> = keys.into_iter().zip(levels).collect();
            keyed.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.1.cmp(&b.1))
            });
            levels = keyed.into_iter().map(|(_, level)| level).collect();
        }

        levels
    }

    pub(crate) fn set_semantic(&mut self, semantic: ColumnSemantic) {
        self.semantic = semantic;
    }

    pub(crate) fn clear(&mut self, row: usize) {
        if let Some(cell) = self.values.get_mut(row) {
            *cell = None;
        }
    }
}

/// Column-oriented table with a fixed natural column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Build a table; all columns must have the same length and distinct
    /// names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map(Column::len).unwrap_or(0);

        let mut names = BTreeSet::new();
        for column in &columns {
            if column.len() != num_rows {
                return Err(FixtureError::schema(format!(
                    "column {} has {} rows, expected {}",
                    column.name,
                    column.len(),
                    num_rows
                )));
            }
            if !names.insert(column.name.as_str()) {
                return Err(FixtureError::schema(format!(
                    "column {} appears more than once",
                    column.name
                )));
            }
        }

        Ok(Table { columns, num_rows })
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Columns in natural order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in natural order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    /// Look a column up by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Look a column up by name, failing with a schema error.
    pub fn require(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| FixtureError::schema(format!("column {} is absent", name)))
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.name == name)
    }

    /// Serialize as CSV with a header row; missing cells are written as
    /// `N/A`.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.columns.iter().map(Column::name))?;

        for row in 0..self.num_rows {
            writer.write_record(self.columns.iter().map(|column| {
                column.values[row].as_deref().unwrap_or(MISSING_VALUE_TOKEN)
            }))?;
        }

        writer
            .into_inner()
            .map_err(|e| FixtureError::serialization(format!("Failed to flush table: {}", e)))
    }

    /// Write the table to `path`, replacing any previous file atomically.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_csv_bytes()?;
        write_atomic(path.as_ref(), &bytes)
    }
}
