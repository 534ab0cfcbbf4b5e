//! Input/Output operations for fixture artifacts.

pub mod artifact;

pub use artifact::{write_atomic, ArtifactWriter};
