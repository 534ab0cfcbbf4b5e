//! Learner interface and the training/prediction adapter.
//!
//! The gradient boosting library itself lives outside this crate. A backend
//! plugs in by implementing [`Learner`] (fit and deserialize) and
//! [`TrainedModel`] (predict and serialize). The [`TrainingAdapter`] wraps a
//! learner with the input checks and iteration handling every variant needs.
//!
//! A trained model is read-only: every prediction method takes `&self`, so
//! evaluating a model at a truncated iteration cannot change what a later
//! full evaluation returns.

pub mod adapter;

pub use adapter::TrainingAdapter;

use crate::config::objective::Objective;
use crate::core::error::Result;
use crate::core::types::BoostingStrategy;
use crate::dataset::split::{FeatureMatrix, TargetVector};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hyperparameters of one training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    /// Objective function
    pub objective: Objective,
    /// Boosting strategy
    pub boosting: BoostingStrategy,
    /// Number of boosting rounds
    pub n_estimators: usize,
    /// Bagging frequency (0 = disabled)
    pub bagging_freq: usize,
    /// Fraction of rows sampled per bagging round
    pub bagging_fraction: f64,
}

impl TrainingParams {
    /// Gradient boosting with no bagging.
    pub fn new(objective: Objective, n_estimators: usize) -> Self {
        TrainingParams {
            objective,
            boosting: BoostingStrategy::GBDT,
            n_estimators,
            bagging_freq: 0,
            bagging_fraction: 1.0,
        }
    }

    /// Switch the boosting strategy.
    pub fn with_boosting(mut self, boosting: BoostingStrategy) -> Self {
        self.boosting = boosting;
        self
    }

    /// Set bagging frequency and fraction.
    pub fn with_bagging(mut self, freq: usize, fraction: f64) -> Self {
        self.bagging_freq = freq;
        self.bagging_fraction = fraction;
        self
    }

    /// Render as string key/value pairs in the learner's parameter
    /// vocabulary. Keys are sorted.
    pub fn as_parameter_map(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("objective".to_string(), self.objective.token().to_string());
        params.insert("boosting".to_string(), self.boosting.to_string());
        params.insert("num_iterations".to_string(), self.n_estimators.to_string());
        if self.bagging_freq > 0 {
            params.insert("bagging_freq".to_string(), self.bagging_freq.to_string());
            params.insert("bagging_fraction".to_string(), self.bagging_fraction.to_string());
        }
        params
    }
}

/// Output of [`TrainedModel::predict`].
#[derive(Debug, Clone, PartialEq)]
pub enum Predictions {
    /// Predicted class label per row
    Labels(Vec<String>),
    /// Predicted value per row
    Values(Array1<f64>),
}

impl Predictions {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Predictions::Labels(labels) => labels.len(),
            Predictions::Values(values) => values.len(),
        }
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fitted model.
pub trait TrainedModel {
    /// Number of boosting rounds the model holds.
    fn num_iterations(&self) -> usize;

    /// Class labels in the order of [`predict_proba`](Self::predict_proba)
    /// columns; `None` for regression models.
    fn classes(&self) -> Option<&[String]>;

    /// Category levels seen in training, keyed by feature index. Empty
    /// when the model was trained without natively encoded categories.
    ///
    /// Features are re-coded against these before every prediction, so a
    /// model loaded from disk sees the same codes it was trained on.
    fn category_levels(&self) -> &BTreeMap<usize, Vec<String>>;

    /// Predict with the first `num_iteration` rounds, or all rounds for
    /// `None`.
    fn predict(
        &self,
        features: &FeatureMatrix,
        num_iteration: Option<usize>,
    ) -> Result<Predictions>;

    /// Class probabilities, one row per sample and one column per class.
    fn predict_proba(
        &self,
        features: &FeatureMatrix,
        num_iteration: Option<usize>,
    ) -> Result<Array2<f64>>;

    /// Serialize to the learner's native text format.
    fn save_model(&self) -> Result<Vec<u8>>;
}

/// A gradient boosting backend.
pub trait Learner {
    /// Model type produced by this learner
    type Model: TrainedModel;

    /// Fit a model.
    fn fit(
        &self,
        params: &TrainingParams,
        features: &FeatureMatrix,
        target: &TargetVector,
    ) -> Result<Self::Model>;

    /// Deserialize a model written by [`TrainedModel::save_model`].
    fn load_model(&self, bytes: &[u8]) -> Result<Self::Model>;
}
