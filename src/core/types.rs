//! Core data types for fixture generation.
//!
//! These enumerations are the closed option sets that task declarations are
//! built from. Their serde spellings match the tokens LightGBM itself uses,
//! so a task manifest reads like the learner's own parameter file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Problem kind of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// Classification into three or more classes
    MulticlassClassification,
    /// Classification into two classes
    BinaryClassification,
    /// Continuous target
    Regression,
    /// Non-negative integer count target
    CountRegression,
}

impl ProblemKind {
    /// Whether predictions carry class probabilities.
    pub fn is_classification(&self) -> bool {
        matches!(
            self,
            ProblemKind::MulticlassClassification | ProblemKind::BinaryClassification
        )
    }

    /// Leading word of every artifact name for this kind.
    pub fn function_name(&self) -> &'static str {
        if self.is_classification() {
            "Classification"
        } else {
            "Regression"
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemKind::MulticlassClassification => write!(f, "multiclass_classification"),
            ProblemKind::BinaryClassification => write!(f, "binary_classification"),
            ProblemKind::Regression => write!(f, "regression"),
            ProblemKind::CountRegression => write!(f, "count_regression"),
        }
    }
}

/// Boosting strategy types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoostingStrategy {
    /// Gradient Boosting Decision Tree
    #[serde(rename = "gbdt")]
    GBDT,
    /// Random Forest
    #[serde(rename = "rf")]
    RandomForest,
    /// Dropouts meet Multiple Additive Regression Trees
    #[serde(rename = "dart")]
    DART,
    /// Gradient One-Side Sampling
    #[serde(rename = "goss")]
    GOSS,
}

impl Default for BoostingStrategy {
    fn default() -> Self {
        BoostingStrategy::GBDT
    }
}

impl BoostingStrategy {
    /// Whether this is the learner's default strategy.
    pub fn is_default(&self) -> bool {
        *self == BoostingStrategy::GBDT
    }

    /// Upper-cased strategy token prepended to artifact names, or `None`
    /// for the default strategy.
    pub fn name_prefix(&self) -> Option<String> {
        if self.is_default() {
            None
        } else {
            Some(self.to_string().to_uppercase())
        }
    }

    /// Whether the strategy trains on row subsamples and therefore needs
    /// bagging parameters.
    pub fn requires_bagging(&self) -> bool {
        *self == BoostingStrategy::RandomForest
    }
}

impl fmt::Display for BoostingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoostingStrategy::GBDT => write!(f, "gbdt"),
            BoostingStrategy::RandomForest => write!(f, "rf"),
            BoostingStrategy::DART => write!(f, "dart"),
            BoostingStrategy::GOSS => write!(f, "goss"),
        }
    }
}

/// How categorical columns reach the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureEncoding {
    /// Categorical columns are integer-coded and flagged by index
    Native,
    /// Categorical columns are expanded into one-hot indicator columns
    Dense,
    /// Raw numeric matrix; categorical columns are flagged by name only
    Direct,
}

impl Default for FeatureEncoding {
    fn default() -> Self {
        FeatureEncoding::Native
    }
}

impl fmt::Display for FeatureEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureEncoding::Native => write!(f, "native"),
            FeatureEncoding::Dense => write!(f, "dense"),
            FeatureEncoding::Direct => write!(f, "direct"),
        }
    }
}

/// Semantic tag attached to a loaded column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSemantic {
    /// Numeric measurement
    Continuous,
    /// Finite set of levels
    Categorical,
}

impl Default for ColumnSemantic {
    fn default() -> Self {
        ColumnSemantic::Continuous
    }
}
