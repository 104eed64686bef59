//! OperatingSystemConfig resource types
//!
//! The subset of the `extensions.gardener.cloud/v1alpha1` API the actuator
//! reads (the OSC spec) and produces (units and files). Field names follow
//! the resource's JSON representation so manifests can be loaded verbatim.

pub mod helper;

pub use helper::dirname;

use serde::{Deserialize, Serialize};
use std::fmt;

/// OperatingSystemConfig resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperatingSystemConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub metadata: ObjectMeta,
    pub spec: OperatingSystemConfigSpec,
}

/// Identifying metadata, used for log context only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Desired OS-level state for a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingSystemConfigSpec {
    pub purpose: Purpose,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<Unit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<File>,
}

impl Default for OperatingSystemConfigSpec {
    fn default() -> Self {
        Self {
            purpose: Purpose::Provision,
            units: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// Phase an OperatingSystemConfig is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// First boot: a monolithic bootstrap script
    Provision,
    /// Steady state: incremental systemd units and files
    Reconcile,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::Provision => write!(f, "provision"),
            Purpose::Reconcile => write!(f, "reconcile"),
        }
    }
}

/// systemd unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Unit {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<UnitCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub drop_ins: Vec<DropIn>,
    /// Files the unit depends on; a change to any of them restarts the unit
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_paths: Vec<String>,
}

/// Command executed for a unit after it was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCommand {
    Start,
    Restart,
    Stop,
}

/// systemd drop-in fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropIn {
    pub name: String,
    pub content: String,
}

/// File written to the node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct File {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<u32>,
    pub content: FileContent,
}

/// File payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<FileContentInline>,
    /// Write the plain payload instead of a base64-decoded heredoc
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmit_unencoded: Option<bool>,
}

/// Inline file payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContentInline {
    /// Empty for plain data, `b64` for base64 data
    #[serde(skip_serializing_if = "String::is_empty")]
    pub encoding: String,
    pub data: String,
}

/// In-place update status
///
/// The Ubuntu actuator does not support in-place updates, so this is never
/// populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InPlaceUpdatesStatus {}

impl File {
    /// File with plain inline data
    pub fn inline(path: impl Into<String>, permissions: Option<u32>, data: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            permissions,
            content: FileContent {
                inline: Some(FileContentInline {
                    encoding: String::new(),
                    data: data.into(),
                }),
                transmit_unencoded: None,
            },
        }
    }
}
