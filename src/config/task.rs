//! Task declarations.
//!
//! A [`Task`] names one dataset, one problem kind and the override axes the
//! enumerator expands into training variants. Tasks are static configuration:
//! they are built once, validated, and never mutated afterwards.

use crate::config::objective::Objective;
use crate::core::constants::{MISSING_VALUES_MARKER, TRUNCATION_SEPARATOR};
use crate::core::error::{FixtureError, Result};
use crate::core::types::{BoostingStrategy, FeatureEncoding, ProblemKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which columns become features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSelection {
    /// Every column except the target, in the table's natural order
    AllExceptTarget,
    /// Exactly these columns, in this order
    Columns(Vec<String>),
}

/// Whether a task trains models or re-validates an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMode {
    /// Train one model per variant
    Train,
    /// Predict with a previously written model artifact, never fitting
    Revalidate {
        /// Artifact name of the model to load
        model: String,
    },
}

impl Default for TaskMode {
    fn default() -> Self {
        TaskMode::Train
    }
}

/// An additional boosting strategy to train alongside the task's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOverride {
    /// Boosting strategy
    pub strategy: BoostingStrategy,
    /// Bagging frequency (0 = disabled)
    #[serde(default)]
    pub bagging_freq: usize,
    /// Fraction of rows sampled per bagging round
    #[serde(default = "default_bagging_fraction")]
    pub bagging_fraction: f64,
    /// Iterations at which this strategy's model is additionally evaluated
    #[serde(default)]
    pub truncations: Vec<usize>,
}

fn default_bagging_fraction() -> f64 {
    1.0
}

impl StrategyOverride {
    /// Create an override without bagging.
    pub fn new(strategy: BoostingStrategy) -> Self {
        StrategyOverride {
            strategy,
            bagging_freq: 0,
            bagging_fraction: default_bagging_fraction(),
            truncations: Vec::new(),
        }
    }

    /// Set bagging frequency and fraction.
    pub fn with_bagging(mut self, freq: usize, fraction: f64) -> Self {
        self.bagging_freq = freq;
        self.bagging_fraction = fraction;
        self
    }

    /// Add a truncated evaluation of this strategy's model.
    pub fn with_truncation(mut self, iteration: usize) -> Self {
        self.truncations.push(iteration);
        self
    }

    fn validate(&self, task: &str) -> Result<()> {
        let parameter = |field: &str| format!("{}.strategies[{}].{}", task, self.strategy, field);

        if self.bagging_fraction <= 0.0 || self.bagging_fraction > 1.0 {
            return Err(FixtureError::invalid_parameter(
                parameter("bagging_fraction"),
                self.bagging_fraction.to_string(),
                "must be in range (0.0, 1.0]",
            ));
        }

        if self.strategy.requires_bagging() {
            if self.bagging_freq == 0 {
                return Err(FixtureError::invalid_parameter(
                    parameter("bagging_freq"),
                    "0",
                    "must be positive for a bagging-based strategy",
                ));
            }
            if self.bagging_fraction >= 1.0 {
                return Err(FixtureError::invalid_parameter(
                    parameter("bagging_fraction"),
                    self.bagging_fraction.to_string(),
                    "must be below 1.0 for a bagging-based strategy",
                ));
            }
        }

        Ok(())
    }
}

/// A named problem definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    kind: ProblemKind,
    target: String,
    features: FeatureSelection,
    #[serde(default)]
    categorical: Vec<String>,
    #[serde(default)]
    encoding: FeatureEncoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    objective: Option<Objective>,
    n_estimators: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reduced_estimators: Option<usize>,
    #[serde(default)]
    strategies: Vec<StrategyOverride>,
    #[serde(default)]
    truncations: Vec<usize>,
    #[serde(default)]
    mode: TaskMode,
}

impl Task {
    /// Dataset name used in artifact names.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dataset source identifier; defaults to the task name.
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.name)
    }

    /// Problem kind.
    pub fn kind(&self) -> ProblemKind {
        self.kind
    }

    /// Target column name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Feature selection mode.
    pub fn features(&self) -> &FeatureSelection {
        &self.features
    }

    /// Columns treated as categorical.
    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    /// Categorical encoding.
    pub fn encoding(&self) -> FeatureEncoding {
        self.encoding
    }

    /// Objective of the task's primary variant.
    pub fn objective(&self) -> Objective {
        self.objective
            .unwrap_or_else(|| Objective::default_for(self.kind))
    }

    /// Objective used by strategy overrides, which always train against the
    /// problem kind's default.
    pub fn default_objective(&self) -> Objective {
        Objective::default_for(self.kind)
    }

    /// Additional boosting strategies.
    pub fn strategies(&self) -> &[StrategyOverride] {
        &self.strategies
    }

    /// Truncation iterations of the primary variant.
    pub fn truncations(&self) -> &[usize] {
        &self.truncations
    }

    /// Task mode.
    pub fn mode(&self) -> &TaskMode {
        &self.mode
    }

    /// Whether the dataset is the missing-values derivative of a base
    /// dataset.
    pub fn has_missing_values_marker(&self) -> bool {
        self.name.ends_with(MISSING_VALUES_MARKER)
    }

    /// Number of boosting rounds to train.
    pub fn estimator_count(&self) -> usize {
        match self.reduced_estimators {
            Some(reduced) if self.has_missing_values_marker() => reduced,
            _ => self.n_estimators,
        }
    }

    /// Whether variants of this task may be evaluated at an earlier
    /// iteration. Direct-matrix and revalidation tasks may not.
    pub fn is_truncation_eligible(&self) -> bool {
        self.mode == TaskMode::Train && self.encoding != FeatureEncoding::Direct
    }

    /// Validate the declaration.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(FixtureError::invalid_parameter("name", "", "must not be empty"));
        }
        if self.name.contains(TRUNCATION_SEPARATOR) {
            return Err(FixtureError::invalid_parameter(
                "name",
                self.name.clone(),
                format!("must not contain the truncation separator '{}'", TRUNCATION_SEPARATOR),
            ));
        }
        if self.target.is_empty() {
            return Err(FixtureError::invalid_parameter(
                format!("{}.target", self.name),
                "",
                "must not be empty",
            ));
        }

        if self.n_estimators == 0 || self.reduced_estimators == Some(0) {
            return Err(FixtureError::invalid_parameter(
                format!("{}.n_estimators", self.name),
                "0",
                "must be at least 1",
            ));
        }

        let objective = self.objective();
        if !objective.supports(self.kind) {
            return Err(FixtureError::invalid_parameter(
                format!("{}.objective", self.name),
                objective.token(),
                format!("cannot train a {} task", self.kind),
            ));
        }

        if let FeatureSelection::Columns(columns) = &self.features {
            if columns.is_empty() {
                return Err(FixtureError::invalid_parameter(
                    format!("{}.features", self.name),
                    "[]",
                    "must list at least one column",
                ));
            }
            if columns.iter().any(|column| column == &self.target) {
                return Err(FixtureError::invalid_parameter(
                    format!("{}.features", self.name),
                    self.target.clone(),
                    "target column cannot be a feature",
                ));
            }
            let mut seen = HashSet::new();
            if let Some(duplicate) = columns.iter().find(|column| !seen.insert(column.as_str())) {
                return Err(FixtureError::invalid_parameter(
                    format!("{}.features", self.name),
                    duplicate.clone(),
                    "listed more than once",
                ));
            }
        }

        if let TaskMode::Revalidate { model } = &self.mode {
            if model.is_empty() {
                return Err(FixtureError::invalid_parameter(
                    format!("{}.mode.model", self.name),
                    "",
                    "must name a model artifact",
                ));
            }
            if !self.strategies.is_empty() {
                return Err(FixtureError::invalid_parameter(
                    format!("{}.strategies", self.name),
                    self.strategies.len().to_string(),
                    "a revalidation task trains nothing",
                ));
            }
        }

        let all_truncations = self
            .truncations
            .iter()
            .chain(self.strategies.iter().flat_map(|s| s.truncations.iter()));
        for &iteration in all_truncations {
            if !self.is_truncation_eligible() {
                return Err(FixtureError::invalid_parameter(
                    format!("{}.truncations", self.name),
                    iteration.to_string(),
                    "task is not eligible for truncated evaluation",
                ));
            }
            if iteration == 0 || iteration > self.estimator_count() {
                return Err(FixtureError::invalid_parameter(
                    format!("{}.truncations", self.name),
                    iteration.to_string(),
                    format!("must be in range [1, {}]", self.estimator_count()),
                ));
            }
        }

        for strategy in &self.strategies {
            strategy.validate(&self.name)?;
        }

        Ok(())
    }
}

/// Fluent builder for [`Task`].
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    /// Start a task with every column except the target as features.
    pub fn new<N: Into<String>, T: Into<String>>(name: N, kind: ProblemKind, target: T) -> Self {
        TaskBuilder {
            task: Task {
                name: name.into(),
                source: None,
                kind,
                target: target.into(),
                features: FeatureSelection::AllExceptTarget,
                categorical: Vec::new(),
                encoding: FeatureEncoding::Native,
                objective: None,
                n_estimators: 100,
                reduced_estimators: None,
                strategies: Vec::new(),
                truncations: Vec::new(),
                mode: TaskMode::Train,
            },
        }
    }

    /// Read the dataset from a differently named source.
    pub fn source<S: Into<String>>(mut self, source: S) -> Self {
        self.task.source = Some(source.into());
        self
    }

    /// Use exactly these feature columns, in this order.
    pub fn features<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.task.features =
            FeatureSelection::Columns(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Mark columns as categorical.
    pub fn categorical<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.task.categorical = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the categorical encoding.
    pub fn encoding(mut self, encoding: FeatureEncoding) -> Self {
        self.task.encoding = encoding;
        self
    }

    /// Override the problem kind's default objective.
    pub fn objective(mut self, objective: Objective) -> Self {
        self.task.objective = Some(objective);
        self
    }

    /// Set the number of boosting rounds.
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.task.n_estimators = n_estimators;
        self
    }

    /// Set the number of boosting rounds used for missing-value datasets.
    pub fn reduced_estimators(mut self, n_estimators: usize) -> Self {
        self.task.reduced_estimators = Some(n_estimators);
        self
    }

    /// Add a boosting strategy variant.
    pub fn strategy(mut self, strategy: StrategyOverride) -> Self {
        self.task.strategies.push(strategy);
        self
    }

    /// Add a truncated evaluation of the primary variant.
    pub fn truncation(mut self, iteration: usize) -> Self {
        self.task.truncations.push(iteration);
        self
    }

    /// Turn the task into a revalidation of an existing model artifact.
    pub fn revalidate<S: Into<String>>(mut self, model: S) -> Self {
        self.task.mode = TaskMode::Revalidate { model: model.into() };
        self
    }

    /// Build and validate the task.
    pub fn build(self) -> Result<Task> {
        self.task.validate()?;
        Ok(self.task)
    }
}
