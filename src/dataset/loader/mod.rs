//! Dataset source loading.

pub mod csv;

pub use self::csv::{CsvConfig, DatasetLoader};
