//! Config and manifest loader
//!
//! Reads the extension config and OperatingSystemConfig manifests from disk.

use super::ExtensionConfig;
use crate::ActuatorError;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Load the extension config from a YAML or JSON file
///
/// A missing path yields the default (empty) config so the actuator can run
/// with built-in defaults.
pub async fn load_extension_config(
    path: Option<impl AsRef<Path>>,
) -> Result<ExtensionConfig, ActuatorError> {
    let Some(path) = path else {
        debug!("No extension config given, using defaults");
        return Ok(ExtensionConfig::default());
    };
    let path = path.as_ref();

    let content = fs::read_to_string(path).await?;
    let config = ExtensionConfig::from_yaml(&content)
        .map_err(|e| ActuatorError::Config(format!("{}: {}", path.display(), e)))?;

    info!("Loaded extension config from {}", path.display());
    Ok(config)
}

/// Load any manifest (YAML or JSON) into a typed value
pub async fn load_manifest<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ActuatorError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).await?;

    debug!("Parsing manifest {}", path.display());
    Ok(serde_yaml::from_str(&content)?)
}
