//! # LightGBM fixture generator
//!
//! Produces the reference artifacts a LightGBM-to-PMML converter is tested
//! against: for every task it trains one or more gradient boosting models,
//! stores each model in LightGBM's text format and stores the model's
//! predictions on its own training data as a CSV table.
//!
//! ## Features
//!
//! - **Declarative tasks**: datasets, targets, feature encodings, objectives
//!   and strategy overrides are plain data, loadable from TOML or JSON.
//! - **Stable artifact names**: `[STRATEGY]<Classification|Regression><Dataset>[@<iteration>]`,
//!   checked for collisions before anything touches the disk.
//! - **Truncated evaluation**: one trained model also yields predictions at
//!   earlier iterations without retraining.
//! - **Pluggable learner**: the boosting library sits behind the
//!   [`Learner`] and [`TrainedModel`] traits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lgbm_fixtures::{catalog, generate, Learner};
//!
//! fn run<L: Learner>(learner: L) -> lgbm_fixtures::Result<()> {
//!     lgbm_fixtures::init();
//!
//!     let mut config = catalog::default_config()?;
//!     config.apply_environment_overrides()?;
//!
//!     let summary = generate(learner, &config)?;
//!     println!("{} models, {} tables", summary.models.len(), summary.tables.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error taxonomy, closed option sets and on-disk constants
//! - [`config`]: tasks, objectives and run configuration
//! - [`dataset`]: CSV loading, feature/target splitting, missing-value derivation
//! - [`variant`]: variant enumeration and artifact naming
//! - [`boosting`]: learner traits and the training adapter
//! - [`prediction`]: prediction table assembly
//! - [`io`]: atomic artifact writes
//! - [`driver`]: end-to-end orchestration
//! - [`catalog`]: the reference fixture set

#![doc(html_root_url = "https://docs.rs/lgbm-fixtures/")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Dataset management module
pub mod dataset;

// Variant enumeration and naming
pub mod variant;

// Learner seam
pub mod boosting;

// Prediction module
pub mod prediction;

// Artifact persistence
pub mod io;

// Orchestration
pub mod driver;

// Reference tasks
pub mod catalog;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{FixtureError, Result},
    types::*,
};

// Re-export configuration functionality
pub use config::{
    CustomObjective, FeatureSelection, FixtureConfig, Objective, StrategyOverride, Task,
    TaskBuilder, TaskMode,
};

// Re-export dataset functionality
pub use dataset::{
    split, Column, DatasetLoader, FeatureMatrix, MissingValueConfig, Table, TargetVector,
};

// Re-export variant functionality
pub use variant::{enumerate, name_for, ArtifactName, Evaluation, ModelSource, Variant};

// Re-export boosting functionality
pub use boosting::{Learner, Predictions, TrainedModel, TrainingAdapter, TrainingParams};

pub use driver::{generate, FixtureDriver, RunSummary};
pub use io::ArtifactWriter;
pub use prediction::PredictionTable;

// Version information
pub use crate::core::constants::LGBM_FIXTURES_VERSION as VERSION;

/// Initialize logging.
///
/// Installs an `env_logger` that honours `RUST_LOG` and defaults to `info`.
/// Calling it more than once is harmless.
pub fn init() {
    core::initialize_logging()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
