//! Prediction table assembly.
//!
//! Column contract:
//!
//! - regression: a single `_target` column with the predicted value;
//! - classification: `_target` holding the predicted class as an index into
//!   the model's class order, followed by one `probability(<index>)` column
//!   per class in that same order.

use crate::core::constants::TARGET_COLUMN;
use crate::core::error::{FixtureError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::collections::HashMap;

/// Contents of the `_target` column.
#[derive(Debug, Clone, PartialEq)]
enum TargetColumn {
    ClassIndex(Vec<usize>),
    Value(Array1<f64>),
}

/// Predictions of one variant, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionTable {
    target: TargetColumn,
    probabilities: Option<Array2<f64>>,
}

impl PredictionTable {
    /// Table of a regression model.
    pub fn regression(values: Array1<f64>) -> Self {
        PredictionTable {
            target: TargetColumn::Value(values),
            probabilities: None,
        }
    }

    /// Table of a classification model.
    ///
    /// `labels` are re-encoded to their position in `classes`, which must
    /// also be the column order of `probabilities`.
    pub fn classification(
        labels: &[String],
        classes: &[String],
        probabilities: Array2<f64>,
    ) -> Result<Self> {
        if probabilities.nrows() != labels.len() {
            return Err(FixtureError::training(format!(
                "{} predicted labels but {} probability rows",
                labels.len(),
                probabilities.nrows()
            )));
        }
        if probabilities.ncols() != classes.len() {
            return Err(FixtureError::training(format!(
                "{} classes but {} probability columns",
                classes.len(),
                probabilities.ncols()
            )));
        }

        let index: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, class)| (class.as_str(), i))
            .collect();
        let encoded = labels
            .iter()
            .map(|label| {
                index.get(label.as_str()).copied().ok_or_else(|| {
                    FixtureError::training(format!(
                        "predicted label {} is not a known class",
                        label
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PredictionTable {
            target: TargetColumn::ClassIndex(encoded),
            probabilities: Some(probabilities),
        })
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        match &self.target {
            TargetColumn::ClassIndex(indices) => indices.len(),
            TargetColumn::Value(values) => values.len(),
        }
    }

    /// Header row.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![TARGET_COLUMN.to_string()];
        if let Some(probabilities) = &self.probabilities {
            names.extend((0..probabilities.ncols()).map(|i| format!("probability({})", i)));
        }
        names
    }

    /// Predicted class indices, for classification tables.
    pub fn class_indices(&self) -> Option<&[usize]> {
        match &self.target {
            TargetColumn::ClassIndex(indices) => Some(indices),
            TargetColumn::Value(_) => None,
        }
    }

    /// Predicted values, for regression tables.
    pub fn values(&self) -> Option<ArrayView1<'_, f64>> {
        match &self.target {
            TargetColumn::Value(values) => Some(values.view()),
            TargetColumn::ClassIndex(_) => None,
        }
    }

    /// Class probabilities, for classification tables.
    pub fn probabilities(&self) -> Option<ArrayView2<'_, f64>> {
        self.probabilities.as_ref().map(Array2::view)
    }

    /// Serialize as CSV.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.column_names())?;

        for row in 0..self.num_rows() {
            let mut record =
                Vec::with_capacity(1 + self.probabilities.as_ref().map_or(0, Array2::ncols));
            record.push(match &self.target {
                TargetColumn::ClassIndex(indices) => indices[row].to_string(),
                TargetColumn::Value(values) => format_float(values[row]),
            });
            if let Some(probabilities) = &self.probabilities {
                record.extend(probabilities.row(row).iter().map(|&p| format_float(p)));
            }
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| {
                FixtureError::serialization(format!("Failed to flush prediction table: {}", e))
            })
    }
}

/// Shortest round-tripping decimal; integral values keep a `.0` suffix and
/// NaN is written as an empty cell.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    let text = value.to_string();
    if value.is_finite() && !text.contains(['.', 'e', 'E']) {
        format!("{}.0", text)
    } else {
        text
    }
}
