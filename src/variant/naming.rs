//! Artifact naming.
//!
//! Names are assembled as
//! `[STRATEGY]<Classification|Regression><Dataset>[@<iteration>]`, where the
//! strategy prefix is the upper-cased strategy token and is omitted for the
//! default strategy. These names are a contract with the downstream
//! conformance suite.

use crate::core::constants::{MODEL_EXTENSION, TABLE_EXTENSION, TRUNCATION_SEPARATOR};
use crate::core::types::{BoostingStrategy, ProblemKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base name of a model file or prediction table, without extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Wrap an existing name, e.g. one read from a task manifest.
    pub fn new<S: Into<String>>(name: S) -> Self {
        ArtifactName(name.into())
    }

    /// The bare name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the serialized model.
    pub fn model_file_name(&self) -> String {
        format!("{}.{}", self.0, MODEL_EXTENSION)
    }

    /// File name of the prediction table.
    pub fn table_file_name(&self) -> String {
        format!("{}.{}", self.0, TABLE_EXTENSION)
    }

    /// Whether the name carries a truncation suffix.
    pub fn is_truncated(&self) -> bool {
        self.0.contains(TRUNCATION_SEPARATOR)
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArtifactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compute the artifact name of one variant.
///
/// A truncation of `Some(0)` means no truncation.
pub fn name_for(
    kind: ProblemKind,
    strategy: BoostingStrategy,
    dataset: &str,
    truncation: Option<usize>,
) -> ArtifactName {
    let mut name = String::new();
    if let Some(prefix) = strategy.name_prefix() {
        name.push_str(&prefix);
    }
    name.push_str(kind.function_name());
    name.push_str(dataset);
    if let Some(iteration) = truncation.filter(|&n| n > 0) {
        name.push(TRUNCATION_SEPARATOR);
        name.push_str(&iteration.to_string());
    }
    ArtifactName(name)
}
