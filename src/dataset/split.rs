//! Feature/target splitting.
//!
//! Turns a loaded [`Table`] into the numeric feature matrix and target vector
//! a learner consumes. How categorical columns appear in the matrix depends on
//! the task's [`FeatureEncoding`]:
//!
//! - `Native`: one column per feature; categories become integer codes over
//!   the sorted level set and the column is listed as categorical.
//! - `Dense`: continuous columns first, then one 0/1 indicator column per
//!   category level. The indicator block is listed as categorical.
//! - `Direct`: raw numeric values; categorical columns must already hold
//!   numbers and are listed by position.
//!
//! Missing cells become NaN in every encoding.

use crate::config::task::{FeatureSelection, Task};
use crate::core::error::{FixtureError, Result};
use crate::core::types::FeatureEncoding;
use crate::dataset::table::{Column, Table};
use ndarray::{Array1, Array2, ArrayView2};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Numeric feature matrix with column metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Array2<f64>,
    categorical_features: Vec<usize>,
    categories: BTreeMap<usize, Vec<String>>,
}

impl FeatureMatrix {
    /// Assemble a matrix from column-major data.
    pub fn from_columns(
        names: Vec<String>,
        columns: Vec<Vec<f64>>,
        categorical_features: Vec<usize>,
        categories: BTreeMap<usize, Vec<String>>,
    ) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(FixtureError::schema(format!(
                "{} feature names for {} columns",
                names.len(),
                columns.len()
            )));
        }

        let num_rows = columns.first().map(Vec::len).unwrap_or(0);
        let mut values = Array2::from_elem((num_rows, columns.len()), f64::NAN);
        for (j, column) in columns.iter().enumerate() {
            if column.len() != num_rows {
                return Err(FixtureError::schema(format!(
                    "feature {} has {} rows, expected {}",
                    names[j],
                    column.len(),
                    num_rows
                )));
            }
            for (i, &value) in column.iter().enumerate() {
                values[[i, j]] = value;
            }
        }

        Ok(FeatureMatrix {
            names,
            values,
            categorical_features,
            categories,
        })
    }

    /// Feature names in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    /// Row-major values.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of feature columns.
    pub fn num_features(&self) -> usize {
        self.values.ncols()
    }

    /// Indices of columns the learner should treat as categorical.
    pub fn categorical_features(&self) -> &[usize] {
        &self.categorical_features
    }

    /// Category levels behind the codes of a natively encoded column.
    pub fn categories(&self, feature: usize) -> Option<&[String]> {
        self.categories.get(&feature).map(Vec::as_slice)
    }

    /// Levels of every natively encoded column, keyed by feature index.
    pub fn category_levels(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.categories
    }

    /// Re-code categorical columns against `levels`, the level lists a model
    /// was trained with. A level the model never saw becomes NaN.
    ///
    /// Borrows `self` unchanged when the level lists already agree.
    pub fn align_categories(
        &self,
        levels: &BTreeMap<usize, Vec<String>>,
    ) -> Result<Cow<'_, FeatureMatrix>> {
        if self.categories == *levels {
            return Ok(Cow::Borrowed(self));
        }
        if !self.categories.keys().eq(levels.keys()) {
            return Err(crate::schema_error!(
                "categorical features {:?} do not match the model's {:?}",
                self.categories.keys().collect::<Vec<_>>(),
                levels.keys().collect::<Vec<_>>()
            ));
        }

        let mut aligned = self.clone();
        for ((&feature, current), trained) in self.categories.iter().zip(levels.values()) {
            let index: HashMap<&str, usize> = trained
                .iter()
                .enumerate()
                .map(|(code, level)| (level.as_str(), code))
                .collect();
            let remap: Vec<f64> = current
                .iter()
                .map(|level| index.get(level.as_str()).map_or(f64::NAN, |&code| code as f64))
                .collect();

            aligned.values.column_mut(feature).mapv_inplace(|code| {
                if code.is_nan() {
                    code
                } else {
                    remap.get(code as usize).copied().unwrap_or(f64::NAN)
                }
            });
        }
        aligned.categories = levels.clone();

        Ok(Cow::Owned(aligned))
    }
}

/// Target column of one task.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetVector {
    /// Class labels of a classification task
    Labels(Vec<String>),
    /// Numeric targets of a regression task
    Values(Array1<f64>),
}

impl TargetVector {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            TargetVector::Labels(labels) => labels.len(),
            TargetVector::Values(values) => values.len(),
        }
    }

    /// Whether the target has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct labels in sorted order; empty for regression targets.
    pub fn classes(&self) -> Vec<String> {
        match self {
            TargetVector::Labels(labels) => {
                let column = Column::new("", labels.iter().cloned().map(Some).collect());
                column.levels()
            }
            TargetVector::Values(_) => Vec::new(),
        }
    }
}

/// Split a table into features and target according to `task`.
pub fn split(table: &Table, task: &Task) -> Result<(FeatureMatrix, TargetVector)> {
    let target_column = table.require(task.target())?;
    let target = extract_target(target_column, task.kind().is_classification())?;

    let selected = select_columns(table, task)?;

    for name in task.categorical() {
        if !selected.iter().any(|column| column.name() == name) {
            return Err(crate::schema_error!(
                "categorical column {} is not among the features of {}",
                name,
                task.name()
            ));
        }
    }

    let features = match task.encoding() {
        FeatureEncoding::Native => encode_native(&selected)?,
        FeatureEncoding::Dense => encode_dense(&selected)?,
        FeatureEncoding::Direct => encode_direct(&selected, task.categorical())?,
    };

    log::debug!(
        "{}: {} rows, {} features ({} categorical)",
        task.name(),
        features.num_rows(),
        features.num_features(),
        features.categorical_features().len()
    );

    Ok((features, target))
}

fn select_columns<'a>(table: &'a Table, task: &Task) -> Result<Vec<&'a Column>> {
    match task.features() {
        FeatureSelection::AllExceptTarget => Ok(table
            .columns()
            .iter()
            .filter(|column| column.name() != task.target())
            .collect()),
        FeatureSelection::Columns(names) => names.iter().map(|name| table.require(name)).collect(),
    }
}

fn extract_target(column: &Column, classification: bool) -> Result<TargetVector> {
    if let Some(row) = column.values().iter().position(Option::is_none) {
        return Err(FixtureError::schema(format!(
            "target column {} is missing a value at row {}",
            column.name(),
            row
        )));
    }

    if classification {
        Ok(TargetVector::Labels(
            column.values().iter().flatten().cloned().collect(),
        ))
    } else {
        Ok(TargetVector::Values(Array1::from(column.numeric_values()?)))
    }
}

fn category_codes(column: &Column) -> (Vec<f64>, Vec<String>) {
    let levels = column.levels();
    let index: HashMap<&str, usize> = levels
        .iter()
        .enumerate()
        .map(|(code, level)| (level.as_str(), code))
        .collect();

    let codes = column
        .values()
        .iter()
        .map(|value| match value {
            Some(text) => index.get(text.as_str()).map_or(f64::NAN, |&code| code as f64),
            None => f64::NAN,
        })
        .collect();

    (codes, levels)
}

fn encode_native(columns: &[&Column]) -> Result<FeatureMatrix> {
    let mut names = Vec::with_capacity(columns.len());
    let mut data = Vec::with_capacity(columns.len());
    let mut categorical = Vec::new();
    let mut categories = BTreeMap::new();

    for (j, column) in columns.iter().enumerate() {
        names.push(column.name().to_string());
        if column.is_categorical() {
            let (codes, levels) = category_codes(column);
            categorical.push(j);
            categories.insert(j, levels);
            data.push(codes);
        } else {
            data.push(column.numeric_values()?);
        }
    }

    FeatureMatrix::from_columns(names, data, categorical, categories)
}

fn encode_dense(columns: &[&Column]) -> Result<FeatureMatrix> {
    let mut names = Vec::new();
    let mut data = Vec::new();

    for column in columns.iter().filter(|column| !column.is_categorical()) {
        names.push(column.name().to_string());
        data.push(column.numeric_values()?);
    }

    let first_indicator = data.len();
    for column in columns.iter().filter(|column| column.is_categorical()) {
        for level in column.levels() {
            names.push(format!("{}_{}", column.name(), level));
            data.push(
                column
                    .values()
                    .iter()
                    .map(|value| match value {
                        Some(text) if *text == level => 1.0,
                        _ => 0.0,
                    })
                    .collect(),
            );
        }
    }

    let categorical = (first_indicator..data.len()).collect();
    FeatureMatrix::from_columns(names, data, categorical, BTreeMap::new())
}

fn encode_direct(columns: &[&Column], categorical_names: &[String]) -> Result<FeatureMatrix> {
    let mut names = Vec::with_capacity(columns.len());
    let mut data = Vec::with_capacity(columns.len());
    let mut categorical = Vec::new();

    for (j, column) in columns.iter().enumerate() {
        names.push(column.name().to_string());
        data.push(column.numeric_values()?);
        if categorical_names.iter().any(|name| name == column.name()) {
            categorical.push(j);
        }
    }

    FeatureMatrix::from_columns(names, data, categorical, BTreeMap::new())
}
