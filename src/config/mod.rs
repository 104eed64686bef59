//! Extension configuration parsing and types
//!
//! Handles the extension-level configuration that controls how operating
//! system configs are rendered: the unattended-upgrades toggle and the NTP
//! daemon selection.

pub mod loader;
pub mod resolve;

pub use loader::{load_extension_config, load_manifest};
pub use resolve::ResolvedConfig;

use crate::ActuatorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extension configuration
///
/// Mirrors the `ExtensionConfig` document handed to the extension at
/// startup. Every field is optional; unset fields fall back to the defaults
/// applied by [`ExtensionConfig::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Disable apt's periodic unattended upgrades on provisioned nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_unattended_upgrades: Option<bool>,

    /// NTP client selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntp: Option<NtpConfig>,
}

/// NTP client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NtpConfig {
    /// Daemon installed on the node
    pub daemon: NtpDaemon,

    /// ntpd specific settings, only meaningful with [`NtpDaemon::Ntpd`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntpd: Option<NtpdConfig>,
}

/// ntpd configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NtpdConfig {
    pub servers: Vec<String>,
}

/// Supported NTP daemons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NtpDaemon {
    #[default]
    #[serde(rename = "systemd-timesyncd")]
    SystemdTimesyncd,
    #[serde(rename = "ntpd")]
    Ntpd,
}

impl NtpDaemon {
    /// Name passed to the NTP installer script
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemdTimesyncd => "systemd-timesyncd",
            Self::Ntpd => "ntpd",
        }
    }
}

impl fmt::Display for NtpDaemon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NtpDaemon {
    type Err = ActuatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "systemd-timesyncd" => Ok(Self::SystemdTimesyncd),
            "ntpd" => Ok(Self::Ntpd),
            other => Err(ActuatorError::Config(format!(
                "unknown NTP daemon '{}', expected one of: systemd-timesyncd, ntpd",
                other
            ))),
        }
    }
}

impl ExtensionConfig {
    /// Parse extension config from YAML (JSON is accepted as well)
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Merge with defaults and validate
    pub fn resolve(&self) -> Result<ResolvedConfig, ActuatorError> {
        resolve::resolve(self)
    }
}
