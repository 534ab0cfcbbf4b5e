//! Dataset preprocessing.

pub mod missing;

pub use missing::{derive_missing_dataset, inject_missing, MissingValueConfig};
