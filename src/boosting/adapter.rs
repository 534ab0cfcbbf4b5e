//! Training and prediction adapter.
//!
//! Sits between the driver and a [`Learner`]: checks that features, target and
//! objective agree before fitting, normalizes iteration limits, and turns raw
//! predictions into a [`PredictionTable`].

use crate::boosting::{Learner, Predictions, TrainedModel};
use crate::core::error::{FixtureError, Result};
use crate::dataset::split::{FeatureMatrix, TargetVector};
use crate::prediction::table::PredictionTable;
use crate::variant::enumerator::{ModelSource, Variant};
use ndarray::Array2;
use std::borrow::Cow;

/// Wraps a learner with input validation and truncation handling.
#[derive(Debug, Clone)]
pub struct TrainingAdapter<L> {
    learner: L,
}

impl<L: Learner> TrainingAdapter<L> {
    /// Wrap a learner.
    pub fn new(learner: L) -> Self {
        TrainingAdapter { learner }
    }

    /// The wrapped learner.
    pub fn learner(&self) -> &L {
        &self.learner
    }

    /// Fit the model of a trained variant.
    pub fn fit(
        &self,
        variant: &Variant,
        features: &FeatureMatrix,
        target: &TargetVector,
    ) -> Result<L::Model> {
        if variant.source != ModelSource::Train {
            return Err(FixtureError::training(format!(
                "{} is loaded from an existing artifact and cannot be fitted",
                variant.model_name
            )));
        }

        if features.num_rows() != target.len() {
            return Err(FixtureError::training(format!(
                "{} feature rows but {} target rows",
                features.num_rows(),
                target.len()
            )));
        }
        if features.num_rows() == 0 {
            return Err(FixtureError::training("cannot train on an empty dataset"));
        }

        let objective = variant.params.objective;
        if !objective.supports(variant.kind) {
            return Err(crate::training_error!(
                "objective {} cannot train a {} model",
                objective, variant.kind
            ));
        }

        match (variant.kind.is_classification(), target) {
            (true, TargetVector::Labels(_)) => {
                let classes = target.classes();
                if classes.len() < 2 {
                    return Err(FixtureError::training(format!(
                        "classification needs at least two classes, found {}",
                        classes.len()
                    )));
                }
            }
            (false, TargetVector::Values(_)) => {}
            _ => {
                return Err(FixtureError::training(format!(
                    "target type does not match a {} model",
                    variant.kind
                )));
            }
        }

        log::info!(
            "Training {} ({}, {}, {} rounds) on {} rows x {} features",
            variant.model_name,
            objective,
            variant.params.boosting,
            variant.params.n_estimators,
            features.num_rows(),
            features.num_features()
        );

        self.learner.fit(&variant.params, features, target)
    }

    /// Deserialize a previously written model.
    pub fn load(&self, bytes: &[u8]) -> Result<L::Model> {
        self.learner
            .load_model(bytes)
            .map_err(|e| FixtureError::serialization(format!("Failed to load model: {}", e)))
    }

    /// Iteration limit to hand to the model; `0` means all rounds.
    fn iteration_limit(model: &L::Model, truncation: Option<usize>) -> Option<usize> {
        match truncation {
            None | Some(0) => None,
            Some(n) if n > model.num_iterations() => {
                log::warn!(
                    "Truncation at {} exceeds the {} trained rounds; predicting with all rounds",
                    n,
                    model.num_iterations()
                );
                None
            }
            Some(n) => Some(n),
        }
    }

    fn aligned<'f>(
        model: &L::Model,
        features: &'f FeatureMatrix,
    ) -> Result<Cow<'f, FeatureMatrix>> {
        let aligned = features.align_categories(model.category_levels())?;
        if let Cow::Owned(_) = aligned {
            log::debug!("Re-coded categorical features against the model's training levels");
        }
        Ok(aligned)
    }

    /// Predict labels or values.
    pub fn predict(
        &self,
        model: &L::Model,
        features: &FeatureMatrix,
        truncation: Option<usize>,
    ) -> Result<Predictions> {
        let features = Self::aligned(model, features)?;
        let predictions = model.predict(&features, Self::iteration_limit(model, truncation))?;
        if predictions.len() != features.num_rows() {
            return Err(FixtureError::training(format!(
                "model returned {} predictions for {} rows",
                predictions.len(),
                features.num_rows()
            )));
        }
        Ok(predictions)
    }

    /// Predict class probabilities in the model's class order.
    pub fn predict_proba(
        &self,
        model: &L::Model,
        features: &FeatureMatrix,
        truncation: Option<usize>,
    ) -> Result<Array2<f64>> {
        let num_classes = model
            .classes()
            .map(<[String]>::len)
            .ok_or_else(|| {
                FixtureError::training("probabilities requested from a regression model")
            })?;

        let features = Self::aligned(model, features)?;
        let probabilities =
            model.predict_proba(&features, Self::iteration_limit(model, truncation))?;
        if probabilities.dim() != (features.num_rows(), num_classes) {
            return Err(FixtureError::training(format!(
                "probability matrix has shape {:?}, expected ({}, {})",
                probabilities.dim(),
                features.num_rows(),
                num_classes
            )));
        }
        Ok(probabilities)
    }

    /// Produce the prediction table of `variant` from `model`.
    pub fn evaluate(
        &self,
        model: &L::Model,
        features: &FeatureMatrix,
        variant: &Variant,
    ) -> Result<PredictionTable> {
        let truncation = variant.truncation();

        if variant.kind.is_classification() {
            let classes = model
                .classes()
                .ok_or_else(|| {
                    FixtureError::training(format!("{} has no class labels", variant.model_name))
                })?;
            let labels = match self.predict(model, features, truncation)? {
                Predictions::Labels(labels) => labels,
                Predictions::Values(_) => {
                    return Err(FixtureError::training(format!(
                        "{} returned values for a classification task",
                        variant.model_name
                    )))
                }
            };
            let probabilities = self.predict_proba(model, features, truncation)?;
            PredictionTable::classification(&labels, classes, probabilities)
        } else {
            match self.predict(model, features, truncation)? {
                Predictions::Values(values) => Ok(PredictionTable::regression(values)),
                Predictions::Labels(_) => Err(FixtureError::training(format!(
                    "{} returned labels for a regression task",
                    variant.model_name
                ))),
            }
        }
    }
}
