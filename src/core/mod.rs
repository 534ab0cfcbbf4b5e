//! Core infrastructure module for fixture generation.
//!
//! - [`types`]: closed option sets used by task declarations
//! - [`constants`]: on-disk tokens, defaults and environment variable names
//! - [`error`]: the error taxonomy shared by every pipeline stage

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{FixtureError, Result};
pub use types::*;

/// Initialize logging.
///
/// Defaults the filter to `info` when `RUST_LOG` is unset and tolerates an
/// already-installed logger, so tests and embedding binaries can both call it.
pub(crate) fn initialize_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}
