//! Error handling and error types for LightGBM fixture generation.
//!
//! Every failure in this crate is fatal to the run: fixtures are built from
//! static inputs, so an error reproduces on every attempt and has to be fixed
//! at its source. The enum below therefore carries no recovery hints, only a
//! stable category that log lines and tests can match on.

use std::io;
use thiserror::Error;

/// Main error type for fixture generation.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Dataset source missing, unreadable or malformed
    #[error("Data source error: {message}")]
    DataSource { message: String },

    /// A referenced column is absent, or column declarations disagree
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// The learner rejected its input shape or objective
    #[error("Training error: {message}")]
    Training { message: String },

    /// Model write or read failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Two variants resolve to the same artifact name
    #[error("Artifact name collision: {name} is produced more than once")]
    NamingCollision { name: String },

    /// Configuration file or environment problems
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// CSV parsing errors
    #[error("CSV parsing error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
}

/// Type alias for Results using FixtureError
pub type Result<T> = std::result::Result<T, FixtureError>;

impl FixtureError {
    /// Create a data source error
    pub fn data_source<S: Into<String>>(message: S) -> Self {
        FixtureError::DataSource {
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema<S: Into<String>>(message: S) -> Self {
        FixtureError::Schema {
            message: message.into(),
        }
    }

    /// Create a training error
    pub fn training<S: Into<String>>(message: S) -> Self {
        FixtureError::Training {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        FixtureError::Serialization {
            message: message.into(),
        }
    }

    /// Create a naming collision error
    pub fn naming_collision<S: Into<String>>(name: S) -> Self {
        FixtureError::NamingCollision { name: name.into() }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        FixtureError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        FixtureError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            FixtureError::DataSource { .. } => "data_source",
            FixtureError::Schema { .. } => "schema",
            FixtureError::Training { .. } => "training",
            FixtureError::Serialization { .. } => "serialization",
            FixtureError::NamingCollision { .. } => "naming_collision",
            FixtureError::Config { .. } => "config",
            FixtureError::InvalidParameter { .. } => "invalid_parameter",
            FixtureError::IO { .. } => "io",
            FixtureError::Csv { .. } => "csv",
            FixtureError::Json { .. } => "json",
            FixtureError::Toml { .. } => "toml",
        }
    }
}

/// Convenience macros for error creation
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::FixtureError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::FixtureError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! schema_error {
    ($msg:expr) => {
        $crate::core::error::FixtureError::schema($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::FixtureError::schema(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! training_error {
    ($msg:expr) => {
        $crate::core::error::FixtureError::training($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::FixtureError::training(format!($fmt, $($arg)*))
    };
}
