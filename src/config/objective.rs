//! Objective function selection for fixture tasks.
//!
//! Objectives are carried as a closed enumeration and rendered to the token
//! the learner understands. A task may also request a custom objective, in
//! which case the learner receives gradient and hessian callbacks instead of
//! a built-in token.

use crate::core::error::{FixtureError, Result};
use crate::core::types::ProblemKind;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User-supplied objectives computed outside the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomObjective {
    /// Squared error expressed through its residual: `grad = pred - true`,
    /// `hess = 1`.
    SquaredResidual,
}

impl CustomObjective {
    /// Identifier recorded in task manifests and in the model's objective
    /// line.
    pub fn name(&self) -> &'static str {
        match self {
            CustomObjective::SquaredResidual => "custom_regression",
        }
    }

    /// Compute per-row gradients and hessians.
    pub fn gradients(
        &self,
        y_true: ArrayView1<'_, f64>,
        y_pred: ArrayView1<'_, f64>,
    ) -> Result<(Array1<f64>, Array1<f64>)> {
        if y_true.len() != y_pred.len() {
            return Err(FixtureError::training(format!(
                "{}: {} labels but {} predictions",
                self.name(),
                y_true.len(),
                y_pred.len()
            )));
        }

        match self {
            CustomObjective::SquaredResidual => {
                let grad = &y_pred - &y_true;
                let hess = Array1::ones(y_true.len());
                Ok((grad, hess))
            }
        }
    }
}

/// Objective function of one training configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Objective {
    /// Softmax multiclass classification
    Multiclass,
    /// Logistic binary classification
    Binary,
    /// Cross-entropy on labels in [0, 1]
    CrossEntropy,
    /// L2 regression
    Regression,
    /// L2 regression, alternative spelling kept as its own token
    MeanSquaredError,
    /// Quantile regression
    Quantile,
    /// Poisson regression
    Poisson,
    /// Tweedie regression
    Tweedie,
    /// Gamma regression
    Gamma,
    /// Objective computed by a user-supplied callback
    Custom(CustomObjective),
}

impl Objective {
    /// Default objective for a problem kind.
    pub fn default_for(kind: ProblemKind) -> Self {
        match kind {
            ProblemKind::MulticlassClassification => Objective::Multiclass,
            ProblemKind::BinaryClassification => Objective::Binary,
            ProblemKind::Regression => Objective::Regression,
            ProblemKind::CountRegression => Objective::Poisson,
        }
    }

    /// Token passed to the learner.
    pub fn token(&self) -> &'static str {
        match self {
            Objective::Multiclass => "multiclass",
            Objective::Binary => "binary",
            Objective::CrossEntropy => "cross_entropy",
            Objective::Regression => "regression",
            Objective::MeanSquaredError => "mean_squared_error",
            Objective::Quantile => "quantile",
            Objective::Poisson => "poisson",
            Objective::Tweedie => "tweedie",
            Objective::Gamma => "gamma",
            Objective::Custom(custom) => custom.name(),
        }
    }

    /// Whether the objective is computed outside the learner.
    pub fn is_custom(&self) -> bool {
        matches!(self, Objective::Custom(_))
    }

    /// The custom objective, if any.
    pub fn custom(&self) -> Option<CustomObjective> {
        match self {
            Objective::Custom(custom) => Some(*custom),
            _ => None,
        }
    }

    /// Whether this objective can train a model for `kind`.
    pub fn supports(&self, kind: ProblemKind) -> bool {
        match self {
            Objective::Multiclass => kind == ProblemKind::MulticlassClassification,
            Objective::Binary | Objective::CrossEntropy => {
                kind == ProblemKind::BinaryClassification
            }
            Objective::Regression
            | Objective::MeanSquaredError
            | Objective::Quantile
            | Objective::Poisson
            | Objective::Tweedie
            | Objective::Gamma
            | Objective::Custom(_) => !kind.is_classification(),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Objective {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "multiclass" | "softmax" => Ok(Objective::Multiclass),
            "binary" => Ok(Objective::Binary),
            "cross_entropy" | "xentropy" => Ok(Objective::CrossEntropy),
            "regression" | "regression_l2" | "l2" => Ok(Objective::Regression),
            "mean_squared_error" | "mse" => Ok(Objective::MeanSquaredError),
            "quantile" => Ok(Objective::Quantile),
            "poisson" => Ok(Objective::Poisson),
            "tweedie" => Ok(Objective::Tweedie),
            "gamma" => Ok(Objective::Gamma),
            "custom_regression" => Ok(Objective::Custom(CustomObjective::SquaredResidual)),
            _ => Err(FixtureError::invalid_parameter(
                "objective",
                s,
                "unknown objective token",
            )),
        }
    }
}

impl TryFrom<String> for Objective {
    type Error = FixtureError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Objective> for String {
    fn from(objective: Objective) -> Self {
        objective.token().to_string()
    }
}
