//! Dataset loading and preparation.
//!
//! This module reads named CSV sources into column-oriented [`Table`]s,
//! splits them into the feature matrix and target vector a learner consumes,
//! and derives the missing-value variants of base datasets.

pub mod loader;
pub mod preprocessing;
pub mod split;
pub mod table;

// Re-export commonly used types
pub use loader::{CsvConfig, DatasetLoader};
pub use preprocessing::{derive_missing_dataset, inject_missing, MissingValueConfig};
pub use split::{split, FeatureMatrix, TargetVector};
pub use table::{Column, Table};
