//! Training variants and their artifact names.

pub mod enumerator;
pub mod naming;

pub use enumerator::{check_unique, enumerate, Evaluation, ModelSource, Variant};
pub use naming::{name_for, ArtifactName};
