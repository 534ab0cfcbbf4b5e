//! Run configuration for fixture generation.
//!
//! A [`FixtureConfig`] holds the three directories the pipeline touches and
//! the ordered task list. It can be read from TOML or JSON, and the
//! directories can be redirected through environment variables.

use crate::config::task::Task;
use crate::core::constants::*;
use crate::core::error::{FixtureError, Result};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Main configuration structure for a fixture run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Directory holding dataset sources
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory receiving serialized models
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    /// Directory receiving prediction tables
    #[serde(default = "default_table_dir")]
    pub table_dir: PathBuf,
    /// Tasks in execution order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_model_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_DIR)
}

fn default_table_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TABLE_DIR)
}

impl Default for FixtureConfig {
    fn default() -> Self {
        FixtureConfig {
            data_dir: default_data_dir(),
            model_dir: default_model_dir(),
            table_dir: default_table_dir(),
            tasks: Vec::new(),
        }
    }
}

impl FixtureConfig {
    /// Create a configuration with default directories and no tasks
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the task list
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.tasks.is_empty() {
            return Err(FixtureError::invalid_parameter(
                "tasks",
                "[]",
                "at least one task must be declared",
            ));
        }

        let mut names = HashSet::new();
        for task in &self.tasks {
            if !names.insert(task.name()) {
                return Err(FixtureError::invalid_parameter(
                    "tasks",
                    task.name(),
                    "task names must be unique",
                ));
            }
            task.validate()?;
        }

        Ok(())
    }

    /// Load configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| FixtureError::config(format!("Failed to read config file: {}", e)))?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| FixtureError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| FixtureError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => {
                return Err(FixtureError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| FixtureError::config(format!("Failed to serialize to JSON: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| FixtureError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => {
                return Err(FixtureError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| FixtureError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Redirect directories from environment variables, where set
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        let overrides = [
            (ENV_DATA_DIR, &mut self.data_dir),
            (ENV_MODEL_DIR, &mut self.model_dir),
            (ENV_TABLE_DIR, &mut self.table_dir),
        ];

        for (variable, dir) in overrides {
            match std::env::var(variable) {
                Ok(value) if value.is_empty() => {
                    return Err(crate::config_error!("{} is set but empty", variable));
                }
                Ok(value) => {
                    log::debug!("{} overrides directory to {}", variable, value);
                    *dir = PathBuf::from(value);
                }
                Err(std::env::VarError::NotPresent) => {}
                Err(std::env::VarError::NotUnicode(_)) => {
                    return Err(crate::config_error!("{} is not valid unicode", variable));
                }
            }
        }

        Ok(())
    }
}
