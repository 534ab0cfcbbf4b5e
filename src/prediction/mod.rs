//! Prediction outputs.

pub mod table;

pub use table::PredictionTable;
