//! Reference fixture set.
//!
//! Declares the tasks behind the published conformance fixtures and the
//! missing-value datasets they depend on. Order matters: `AuditInvalid`
//! re-reads the model written by `Audit`.

use crate::config::core::FixtureConfig;
use crate::config::objective::{CustomObjective, Objective};
use crate::config::task::{StrategyOverride, Task, TaskBuilder};
use crate::core::error::Result;
use crate::core::types::{BoostingStrategy, FeatureEncoding, ProblemKind};
use crate::dataset::loader::DatasetLoader;
use crate::dataset::preprocessing::missing::{derive_missing_dataset, MissingValueConfig};
use std::path::PathBuf;

const AUDIT_FEATURES: [&str; 9] = [
    "Age",
    "Employment",
    "Education",
    "Marital",
    "Occupation",
    "Income",
    "Gender",
    "Deductions",
    "Hours",
];
const AUDIT_CATEGORICAL: [&str; 6] = [
    "Employment",
    "Education",
    "Marital",
    "Occupation",
    "Gender",
    "Deductions",
];
const AUDIT_BIN_FEATURES: [&str; 8] = [
    "Age",
    "Income",
    "Hours",
    "Employment",
    "Education",
    "Marital",
    "Occupation",
    "Gender",
];
const AUDIT_BIN_CATEGORICAL: [&str; 5] =
    ["Employment", "Education", "Marital", "Occupation", "Gender"];

const AUTO_FEATURES: [&str; 7] = [
    "cylinders",
    "displacement",
    "horsepower",
    "weight",
    "acceleration",
    "model_year",
    "origin",
];
const AUTO_CATEGORICAL: [&str; 3] = ["cylinders", "model_year", "origin"];

const HOUSING_COLUMNS: [&str; 13] = [
    "CRIM", "ZN", "INDUS", "CHAS", "NOX", "RM", "AGE", "DIS", "RAD", "TAX", "PTRATIO", "B", "LSTAT",
];

const IRIS_COLUMNS: [&str; 4] = ["Sepal.Length", "Sepal.Width", "Petal.Length", "Petal.Width"];

const VISIT_FEATURES: [&str; 8] =
    ["age", "outwork", "female", "married", "kids", "hhninc", "educ", "self"];
const VISIT_CATEGORICAL: [&str; 5] = ["outwork", "female", "married", "kids", "self"];

fn iris(name: &str) -> TaskBuilder {
    TaskBuilder::new(name, ProblemKind::MulticlassClassification, "Species")
        .n_estimators(200)
        .reduced_estimators(11)
        .truncation(7)
}

fn audit(name: &str) -> TaskBuilder {
    TaskBuilder::new(name, ProblemKind::BinaryClassification, "Adjusted")
        .features(AUDIT_FEATURES)
        .categorical(AUDIT_CATEGORICAL)
        .n_estimators(31)
}

fn audit_bin(name: &str, source: &str) -> TaskBuilder {
    TaskBuilder::new(name, ProblemKind::BinaryClassification, "Adjusted")
        .source(source)
        .features(AUDIT_BIN_FEATURES)
        .categorical(AUDIT_BIN_CATEGORICAL)
        .encoding(FeatureEncoding::Dense)
        .n_estimators(31)
}

fn auto(name: &str) -> TaskBuilder {
    TaskBuilder::new(name, ProblemKind::Regression, "mpg")
        .features(AUTO_FEATURES)
        .categorical(AUTO_CATEGORICAL)
        .n_estimators(31)
}

fn auto_direct(name: &str, source: &str) -> TaskBuilder {
    auto(name).source(source).encoding(FeatureEncoding::Direct)
}

fn housing(name: &str) -> TaskBuilder {
    TaskBuilder::new(name, ProblemKind::Regression, "MEDV")
        .categorical(["CHAS"])
        .n_estimators(51)
        .truncation(31)
}

fn visit(name: &str) -> TaskBuilder {
    TaskBuilder::new(name, ProblemKind::CountRegression, "docvis")
        .features(VISIT_FEATURES)
        .categorical(VISIT_CATEGORICAL)
        .n_estimators(71)
        .truncation(31)
}

/// The reference task list, in execution order.
pub fn default_tasks() -> Result<Vec<Task>> {
    let random_forest =
        |freq| StrategyOverride::new(BoostingStrategy::RandomForest).with_bagging(freq, 0.75);

    Ok(vec![
        iris("Iris").strategy(random_forest(3)).build()?,
        iris("IrisNA").build()?,
        audit("Audit").truncation(17).strategy(random_forest(10)).build()?,
        audit("AuditNA").objective(Objective::CrossEntropy).truncation(17).build()?,
        audit("AuditInvalid").revalidate("ClassificationAudit").build()?,
        audit_bin("AuditBin", "Audit").build()?,
        audit_bin("AuditBinNA", "AuditNA").build()?,
        TaskBuilder::new("Versicolor", ProblemKind::BinaryClassification, "Species")
            .features(["Sepal.Length", "Sepal.Width", "Dummy", "Petal.Length", "Petal.Width"])
            .n_estimators(11)
            .truncation(9)
            .build()?,
        auto("Auto")
            .objective(Objective::Custom(CustomObjective::SquaredResidual))
            .truncation(17)
            .strategy(random_forest(5))
            .build()?,
        auto("AutoNA").truncation(17).build()?,
        auto_direct("AutoDirect", "Auto").build()?,
        auto_direct("AutoDirectNA", "AutoNA").build()?,
        housing("Housing").objective(Objective::MeanSquaredError).build()?,
        housing("HousingNA").objective(Objective::Quantile).build()?,
        visit("Visit").build()?,
        visit("VisitNA").objective(Objective::Tweedie).build()?,
    ])
}

/// Default directories with the reference task list.
pub fn default_config() -> Result<FixtureConfig> {
    Ok(FixtureConfig::new().with_tasks(default_tasks()?))
}

/// One `*NA` dataset derived from a base dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValueDerivation {
    /// Base dataset
    pub source: &'static str,
    /// Derived dataset
    pub target: &'static str,
    /// Columns receiving missing values
    pub columns: &'static [&'static str],
}

/// The reference missing-value derivations.
pub fn missing_value_derivations() -> Vec<MissingValueDerivation> {
    vec![
        MissingValueDerivation {
            source: "Auto",
            target: "AutoNA",
            columns: &AUTO_FEATURES,
        },
        MissingValueDerivation {
            source: "Housing",
            target: "HousingNA",
            columns: &HOUSING_COLUMNS,
        },
        MissingValueDerivation {
            source: "Iris",
            target: "IrisNA",
            columns: &IRIS_COLUMNS,
        },
        MissingValueDerivation {
            source: "Visit",
            target: "VisitNA",
            columns: &VISIT_FEATURES,
        },
    ]
}

/// Write every reference `*NA` dataset next to its base dataset.
pub fn derive_missing_datasets(loader: &DatasetLoader) -> Result<Vec<PathBuf>> {
    let config = MissingValueConfig::default();
    missing_value_derivations()
        .iter()
        .map(|derivation| {
            let columns: Vec<String> = derivation.columns.iter().map(|c| c.to_string()).collect();
            derive_missing_dataset(loader, derivation.source, derivation.target, &columns, &config)
        })
        .collect()
}
