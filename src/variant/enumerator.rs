//! Variant enumeration.
//!
//! Expands a task into the ordered list of (configuration, evaluation) pairs
//! the driver executes. Order within a task:
//!
//! 1. the primary configuration evaluated in full, then at each of its
//!    truncations;
//! 2. each strategy override evaluated in full, then at each of its own
//!    truncations.
//!
//! A truncated variant always follows the full variant of the same model, so
//! the driver can reuse the model it just trained.

use crate::boosting::TrainingParams;
use crate::config::task::{Task, TaskMode};
use crate::core::error::{FixtureError, Result};
use crate::core::types::{BoostingStrategy, ProblemKind};
use crate::variant::naming::{name_for, ArtifactName};
use std::collections::HashSet;

/// Where a variant's model comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Fit a new model from the variant's parameters
    Train,
    /// Load a previously written model artifact
    External(ArtifactName),
}

/// How many boosting rounds a variant predicts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Every trained round
    Full,
    /// The first `n` rounds
    Truncated(usize),
}

/// One concrete configuration of a task.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Problem kind of the owning task
    pub kind: ProblemKind,
    /// Hyperparameters handed to the learner
    pub params: TrainingParams,
    /// Name of the model this variant trains or loads
    pub model_name: ArtifactName,
    /// Name of the prediction table this variant writes
    pub prediction_name: ArtifactName,
    /// Model origin
    pub source: ModelSource,
    /// Evaluation iteration
    pub evaluation: Evaluation,
}

impl Variant {
    /// Iteration limit to predict with, if truncated.
    pub fn truncation(&self) -> Option<usize> {
        match self.evaluation {
            Evaluation::Full => None,
            Evaluation::Truncated(n) => Some(n),
        }
    }

    /// Whether running this variant writes a model artifact.
    pub fn writes_model(&self) -> bool {
        self.source == ModelSource::Train && self.evaluation == Evaluation::Full
    }
}

/// Expand a task into its variants.
pub fn enumerate(task: &Task) -> Result<Vec<Variant>> {
    task.validate()?;

    let kind = task.kind();
    let mut variants = Vec::new();

    match task.mode() {
        TaskMode::Revalidate { model } => {
            variants.push(Variant {
                kind,
                params: TrainingParams::new(task.objective(), task.estimator_count()),
                model_name: ArtifactName::new(model.clone()),
                prediction_name: name_for(kind, BoostingStrategy::GBDT, task.name(), None),
                source: ModelSource::External(ArtifactName::new(model.clone())),
                evaluation: Evaluation::Full,
            });
        }
        TaskMode::Train => {
            let primary = TrainingParams::new(task.objective(), task.estimator_count());
            push_trained(&mut variants, task, primary, task.truncations());

            for strategy in task.strategies() {
                let params = TrainingParams::new(task.default_objective(), task.estimator_count())
                    .with_boosting(strategy.strategy)
                    .with_bagging(strategy.bagging_freq, strategy.bagging_fraction);
                push_trained(&mut variants, task, params, &strategy.truncations);
            }
        }
    }

    check_unique(&variants)?;

    log::debug!("{}: {} variants", task.name(), variants.len());
    Ok(variants)
}

fn push_trained(
    variants: &mut Vec<Variant>,
    task: &Task,
    params: TrainingParams,
    truncations: &[usize],
) {
    let kind = task.kind();
    let strategy = params.boosting;
    let model_name = name_for(kind, strategy, task.name(), None);

    variants.push(Variant {
        kind,
        params: params.clone(),
        model_name: model_name.clone(),
        prediction_name: model_name.clone(),
        source: ModelSource::Train,
        evaluation: Evaluation::Full,
    });

    for &iteration in truncations {
        variants.push(Variant {
            kind,
            params: params.clone(),
            model_name: model_name.clone(),
            prediction_name: name_for(kind, strategy, task.name(), Some(iteration)),
            source: ModelSource::Train,
            evaluation: Evaluation::Truncated(iteration),
        });
    }
}

/// Fail if two variants would write the same prediction table or the same
/// model file.
pub fn check_unique<'a, I>(variants: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Variant>,
{
    let mut tables = HashSet::new();
    let mut models = HashSet::new();

    for variant in variants {
        if !tables.insert(&variant.prediction_name) {
            return Err(FixtureError::naming_collision(variant.prediction_name.as_str()));
        }
        if variant.writes_model() && !models.insert(&variant.model_name) {
            return Err(FixtureError::naming_collision(variant.model_name.as_str()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::objective::Objective;
    use crate::config::task::{StrategyOverride, TaskBuilder};

    fn names(variants: &[Variant]) -> Vec<&str> {
        variants.iter().map(|v| v.prediction_name.as_str()).collect()
    }

    #[test]
    fn test_iris_variants() {
        let task = TaskBuilder::new("Iris", ProblemKind::MulticlassClassification, "Species")
            .n_estimators(200)
            .truncation(7)
            .strategy(StrategyOverride::new(BoostingStrategy::RandomForest).with_bagging(3, 0.75))
            .build()
            .unwrap();

        let variants = enumerate(&task).unwrap();
        assert_eq!(
            names(&variants),
            vec!["ClassificationIris", "ClassificationIris@7", "RFClassificationIris"]
        );

        assert_eq!(variants[1].model_name.as_str(), "ClassificationIris");
        assert_eq!(variants[1].truncation(), Some(7));
        assert!(variants[0].writes_model());
        assert!(!variants[1].writes_model());

        let rf = &variants[2];
        assert_eq!(rf.params.boosting, BoostingStrategy::RandomForest);
        assert_eq!(rf.params.bagging_freq, 3);
        assert_eq!(rf.params.n_estimators, 200);
    }

    #[test]
    fn test_strategy_uses_default_objective() {
        let task = TaskBuilder::new("Auto", ProblemKind::Regression, "mpg")
            .objective(Objective::MeanSquaredError)
            .n_estimators(31)
            .strategy(StrategyOverride::new(BoostingStrategy::RandomForest).with_bagging(5, 0.75))
            .build()
            .unwrap();

        let variants = enumerate(&task).unwrap();
        assert_eq!(variants[0].params.objective, Objective::MeanSquaredError);
        assert_eq!(variants[1].params.objective, Objective::Regression);
    }

    #[test]
    fn test_strategy_truncations() {
        let task = TaskBuilder::new("Visit", ProblemKind::CountRegression, "docvis")
            .n_estimators(71)
            .strategy(StrategyOverride::new(BoostingStrategy::GOSS).with_truncation(31))
            .build()
            .unwrap();

        let variants = enumerate(&task).unwrap();
        assert_eq!(
            names(&variants),
            vec!["RegressionVisit", "GOSSRegressionVisit", "GOSSRegressionVisit@31"]
        );
        assert_eq!(variants[2].model_name.as_str(), "GOSSRegressionVisit");
    }

    #[test]
    fn test_reduced_estimators() {
        let task = TaskBuilder::new("IrisNA", ProblemKind::MulticlassClassification, "Species")
            .n_estimators(200)
            .reduced_estimators(11)
            .truncation(7)
            .build()
            .unwrap();

        let variants = enumerate(&task).unwrap();
        assert!(variants.iter().all(|v| v.params.n_estimators == 11));
    }

    #[test]
    fn test_revalidation_variant() {
        let task = TaskBuilder::new("AuditInvalid", ProblemKind::BinaryClassification, "Adjusted")
            .revalidate("ClassificationAudit")
            .build()
            .unwrap();

        let variants = enumerate(&task).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].prediction_name.as_str(), "ClassificationAuditInvalid");
        assert_eq!(
            variants[0].source,
            ModelSource::External(ArtifactName::new("ClassificationAudit"))
        );
        assert!(!variants[0].writes_model());
    }

    #[test]
    fn test_duplicate_truncation_collides() {
        let task = TaskBuilder::new("Housing", ProblemKind::Regression, "MEDV")
            .n_estimators(51)
            .truncation(31)
            .truncation(31)
            .build()
            .unwrap();

        let err = enumerate(&task).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::NamingCollision { ref name } if name == "RegressionHousing@31"
        ));
    }

    #[test]
    fn test_duplicate_strategy_collides() {
        let task = TaskBuilder::new("Housing", ProblemKind::Regression, "MEDV")
            .strategy(StrategyOverride::new(BoostingStrategy::DART))
            .strategy(StrategyOverride::new(BoostingStrategy::DART))
            .build()
            .unwrap();

        assert!(matches!(enumerate(&task), Err(FixtureError::NamingCollision { .. })));
    }
}
