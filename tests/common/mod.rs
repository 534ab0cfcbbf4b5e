//! Common test utilities for fixture generation integration tests.

#![allow(dead_code)]

use lgbm_fixtures::*;
use ndarray::{Array1, Array2};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Deterministic stand-in for a gradient boosting backend.
///
/// Every round adds a fixed, shrinking contribution to the score, so
/// predicting with fewer rounds gives a visibly different result. Each
/// feature value feeds the score through a sine, so a category code that
/// shifts by one changes the prediction.
#[derive(Debug, Default)]
pub struct MockLearner {
    fits: Cell<usize>,
}

impl MockLearner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of models fitted so far.
    pub fn fit_count(&self) -> usize {
        self.fits.get()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockModel {
    pub params: BTreeMap<String, String>,
    pub feature_names: Vec<String>,
    pub classes: Option<Vec<String>>,
    pub categories: BTreeMap<usize, Vec<String>>,
    pub base: Vec<f64>,
    pub rounds: usize,
}

fn step(round: usize) -> f64 {
    0.1 / (round + 1) as f64
}

fn row_signal(features: &FeatureMatrix, row: usize) -> f64 {
    let values = features.values();
    let present: Vec<f64> = values.row(row).iter().copied().filter(|v| !v.is_nan()).collect();
    if present.is_empty() {
        0.0
    } else {
        present.iter().map(|v| (v * 0.37).sin()).sum::<f64>() / present.len() as f64
    }
}

impl MockModel {
    fn scores(&self, features: &FeatureMatrix, num_iteration: Option<usize>) -> Array2<f64> {
        let rounds = num_iteration.unwrap_or(self.rounds).min(self.rounds);
        let shrink: f64 = (0..rounds).map(step).sum();
        let outputs = self.base.len();
        let centre = (outputs as f64 - 1.0) / 2.0;

        let mut scores = Array2::zeros((features.num_rows(), outputs));
        for i in 0..features.num_rows() {
            let signal = row_signal(features, i);
            for c in 0..outputs {
                let direction = if outputs == 1 { 1.0 } else { c as f64 - centre };
                scores[[i, c]] = self.base[c] + shrink * signal * direction;
            }
        }
        scores
    }
}

/// Index of the first maximum.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = i;
        }
    }
    best
}

impl TrainedModel for MockModel {
    fn num_iterations(&self) -> usize {
        self.rounds
    }

    fn classes(&self) -> Option<&[String]> {
        self.classes.as_deref()
    }

    fn category_levels(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.categories
    }

    fn predict(
        &self,
        features: &FeatureMatrix,
        num_iteration: Option<usize>,
    ) -> Result<Predictions> {
        match &self.classes {
            Some(classes) => {
                let probabilities = self.predict_proba(features, num_iteration)?;
                let labels = probabilities
                    .rows()
                    .into_iter()
                    .map(|row| classes[argmax(&row.to_vec())].clone())
                    .collect();
                Ok(Predictions::Labels(labels))
            }
            None => {
                let scores = self.scores(features, num_iteration);
                Ok(Predictions::Values(scores.column(0).to_owned()))
            }
        }
    }

    fn predict_proba(
        &self,
        features: &FeatureMatrix,
        num_iteration: Option<usize>,
    ) -> Result<Array2<f64>> {
        let mut scores = self.scores(features, num_iteration);
        for mut row in scores.rows_mut() {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            row.mapv_inplace(|s| (s - max).exp());
            let total: f64 = row.sum();
            row.mapv_inplace(|s| s / total);
        }
        Ok(scores)
    }

    fn save_model(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

impl Learner for MockLearner {
    type Model = MockModel;

    fn fit(
        &self,
        params: &TrainingParams,
        features: &FeatureMatrix,
        target: &TargetVector,
    ) -> Result<MockModel> {
        self.fits.set(self.fits.get() + 1);

        let (classes, base) = match target {
            TargetVector::Labels(labels) => {
                let classes = target.classes();
                let base = classes
                    .iter()
                    .map(|class| {
                        let count = labels.iter().filter(|label| *label == class).count();
                        (count as f64 / labels.len() as f64).ln()
                    })
                    .collect();
                (Some(classes), base)
            }
            TargetVector::Values(values) => {
                let mean = match params.objective.custom() {
                    Some(custom) => {
                        let zeros = Array1::zeros(values.len());
                        let (grad, hess) = custom.gradients(values.view(), zeros.view())?;
                        -grad.sum() / hess.sum()
                    }
                    None => values.mean().unwrap_or(0.0),
                };
                (None, vec![mean])
            }
        };

        Ok(MockModel {
            params: params.as_parameter_map(),
            feature_names: features.feature_names().to_vec(),
            classes,
            categories: features.category_levels().clone(),
            base,
            rounds: params.n_estimators,
        })
    }

    fn load_model(&self, bytes: &[u8]) -> Result<MockModel> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Temporary workspace with `data`, `models` and `tables` directories.
pub struct Workspace {
    pub root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("data")).unwrap();
        Workspace { root }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn model_dir(&self) -> PathBuf {
        self.root.path().join("models")
    }

    pub fn table_dir(&self) -> PathBuf {
        self.root.path().join("tables")
    }

    pub fn config(&self, tasks: Vec<Task>) -> FixtureConfig {
        FixtureConfig {
            data_dir: self.data_dir(),
            model_dir: self.model_dir(),
            table_dir: self.table_dir(),
            tasks,
        }
    }

    pub fn driver(&self) -> FixtureDriver<MockLearner> {
        FixtureDriver::from_config(MockLearner::new(), &self.config(Vec::new()))
    }

    pub fn read_table(&self, name: &str) -> String {
        fs::read_to_string(self.table_dir().join(format!("{}.csv", name))).unwrap()
    }

    pub fn model_path(&self, name: &str) -> PathBuf {
        self.model_dir().join(format!("{}.txt", name))
    }

    /// Write every reference dataset, including the derived `*NA` ones.
    pub fn with_reference_datasets(self) -> Self {
        let data = self.data_dir();
        write_iris(&data, "Iris", 30);
        write_audit(&data, "Audit", 40, 7);
        write_audit(&data, "AuditInvalid", 12, 99);
        write_versicolor(&data, "Versicolor", 20);
        write_auto(&data, "Auto", 40);
        write_housing(&data, "Housing", 40);
        write_visit(&data, "Visit", 40);

        let loader = DatasetLoader::new(&data);
        catalog::derive_missing_datasets(&loader).unwrap();

        let audit_columns: Vec<String> = [
            "Age", "Employment", "Education", "Marital", "Occupation",
            "Income", "Gender", "Deductions", "Hours",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        dataset::derive_missing_dataset(
            &loader,
            "Audit",
            "AuditNA",
            &audit_columns,
            &MissingValueConfig::default(),
        )
            .unwrap();

        self
    }
}

/// Write `<dir>/<name>.csv`.
pub fn write_csv(dir: &Path, name: &str, header: &[&str], rows: &[Vec<String>]) {
    let mut content = header.join(",");
    content.push('\n');
    for row in rows {
        content.push_str(&row.join(","));
        content.push('\n');
    }
    fs::write(dir.join(format!("{}.csv", name)), content).unwrap();
}

fn number(rng: &mut StdRng, low: f64, high: f64) -> String {
    format!("{:.1}", rng.gen_range(low..high))
}

pub fn write_iris(dir: &Path, name: &str, rows: usize) {
    let mut rng = StdRng::seed_from_u64(42);
    let species = ["setosa", "versicolor", "virginica"];
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            let s = i % 3;
            let offset = s as f64 * 1.5;
            vec![
                number(&mut rng, 4.5 + offset, 5.5 + offset),
                number(&mut rng, 2.5, 3.5),
                number(&mut rng, 1.0 + offset, 2.0 + offset),
                number(&mut rng, 0.1 + offset / 2.0, 0.5 + offset / 2.0),
                species[s].to_string(),
            ]
        })
        .collect();
    write_csv(
        dir,
        name,
        &["Sepal.Length", "Sepal.Width", "Petal.Length", "Petal.Width", "Species"],
        &data,
    );
}

pub fn write_audit(dir: &Path, name: &str, rows: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let employment = ["Private", "Consultant", "PSLocal", "SelfEmp"];
    let education = ["College", "HSgrad", "Bachelor", "Master"];
    let marital = ["Married", "Absent", "Divorced"];
    let occupation = ["Service", "Transport", "Clerical", "Repair"];
    let gender = ["Male", "Female"];
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            vec![
                rng.gen_range(18..80).to_string(),
                employment[rng.gen_range(0..employment.len())].to_string(),
                education[rng.gen_range(0..education.len())].to_string(),
                marital[rng.gen_range(0..marital.len())].to_string(),
                occupation[rng.gen_range(0..occupation.len())].to_string(),
                format!("{:.2}", rng.gen_range(1000.0..200000.0)),
                gender[i % 2].to_string(),
                (rng.gen_range(0..4) * 500).to_string(),
                rng.gen_range(10..70).to_string(),
                (i % 2).to_string(),
            ]
        })
        .collect();
    write_csv(
        dir,
        name,
        &[
            "Age", "Employment", "Education", "Marital", "Occupation",
            "Income", "Gender", "Deductions", "Hours",
            "Adjusted",
        ],
        &data,
    );
}

pub fn write_versicolor(dir: &Path, name: &str, rows: usize) {
    let mut rng = StdRng::seed_from_u64(5);
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            vec![
                number(&mut rng, 4.5, 7.0),
                number(&mut rng, 2.0, 4.0),
                (i % 4).to_string(),
                number(&mut rng, 1.0, 6.0),
                number(&mut rng, 0.1, 2.0),
                (i % 2).to_string(),
            ]
        })
        .collect();
    write_csv(
        dir,
        name,
        &["Sepal.Length", "Sepal.Width", "Dummy", "Petal.Length", "Petal.Width", "Species"],
        &data,
    );
}

pub fn write_auto(dir: &Path, name: &str, rows: usize) {
    let mut rng = StdRng::seed_from_u64(11);
    let cylinders = [4, 6, 8];
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            vec![
                number(&mut rng, 10.0, 40.0),
                cylinders[i % 3].to_string(),
                number(&mut rng, 70.0, 400.0),
                number(&mut rng, 50.0, 200.0),
                rng.gen_range(1600..5000).to_string(),
                number(&mut rng, 8.0, 25.0),
                (70 + i % 13).to_string(),
                (1 + i % 3).to_string(),
            ]
        })
        .collect();
    write_csv(
        dir,
        name,
        &[
            "mpg",
            "cylinders",
            "displacement",
            "horsepower",
            "weight",
            "acceleration",
            "model_year",
            "origin",
        ],
        &data,
    );
}

pub fn write_housing(dir: &Path, name: &str, rows: usize) {
    let mut rng = StdRng::seed_from_u64(13);
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            vec![
                format!("{:.5}", rng.gen_range(0.0..10.0)),
                number(&mut rng, 0.0, 100.0),
                number(&mut rng, 0.5, 25.0),
                (i % 2).to_string(),
                format!("{:.3}", rng.gen_range(0.38..0.87)),
                format!("{:.3}", rng.gen_range(3.5..8.7)),
                number(&mut rng, 2.0, 100.0),
                format!("{:.4}", rng.gen_range(1.1..12.1)),
                rng.gen_range(1..24).to_string(),
                rng.gen_range(187..711).to_string(),
                number(&mut rng, 12.6, 22.0),
                number(&mut rng, 0.3, 396.9),
                number(&mut rng, 1.7, 38.0),
                number(&mut rng, 5.0, 50.0),
            ]
        })
        .collect();
    write_csv(
        dir,
        name,
        &[
            "CRIM", "ZN", "INDUS", "CHAS", "NOX", "RM", "AGE",
            "DIS", "RAD", "TAX", "PTRATIO", "B", "LSTAT", "MEDV",
        ],
        &data,
    );
}

pub fn write_visit(dir: &Path, name: &str, rows: usize) {
    let mut rng = StdRng::seed_from_u64(17);
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            vec![
                rng.gen_range(20..65).to_string(),
                (i % 2).to_string(),
                ((i / 2) % 2).to_string(),
                ((i / 3) % 2).to_string(),
                ((i / 5) % 2).to_string(),
                format!("{:.4}", rng.gen_range(0.1..3.0)),
                number(&mut rng, 7.0, 18.0),
                ((i / 7) % 2).to_string(),
                rng.gen_range(0..10).to_string(),
            ]
        })
        .collect();
    write_csv(
        dir,
        name,
        &["age", "outwork", "female", "married", "kids", "hhninc", "educ", "self", "docvis"],
        &data,
    );
}

/// Parse a prediction table into its header and numeric rows.
pub fn parse_table(content: &str) -> (Vec<String>, Vec<Vec<f64>>) {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let header = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .unwrap()
                .iter()
                .map(|cell| cell.parse::<f64>().unwrap())
                .collect()
        })
        .collect();
    (header, rows)
}

/// Every file name below `dir`, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
