//! Error types for os-ubuntu-rs

use thiserror::Error;

/// Main error type for actuator operations
#[derive(Error, Debug)]
pub enum ActuatorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid content for file '{path}': {message}")]
    FileContent { path: String, message: String },

    #[error("Invalid unit '{unit}': {message}")]
    Unit { unit: String, message: String },

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl ActuatorError {
    /// Create a file content error
    pub fn file_content(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileContent {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a unit error
    pub fn unit(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unit {
            unit: unit.into(),
            message: message.into(),
        }
    }
}
