//! Configuration for fixture generation.
//!
//! - [`objective`]: objective tokens and custom objectives
//! - [`task`]: declarative task records and their builder
//! - [`core`]: run-level configuration (directories + task list)

pub mod core;
pub mod objective;
pub mod task;

pub use self::core::FixtureConfig;
pub use objective::{CustomObjective, Objective};
pub use task::{FeatureSelection, StrategyOverride, Task, TaskBuilder, TaskMode};

/// Default name of a task manifest.
pub const DEFAULT_CONFIG_FILE: &str = "fixtures.toml";
