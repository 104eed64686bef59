//! Template context building
//!
//! Builds the context for the provision script from the OSC spec and the
//! resolved extension config. All payloads are encoded here so the template
//! only lays out text.

use crate::ActuatorError;
use crate::api::helper::heredoc_delimiter;
use crate::api::{File, OperatingSystemConfigSpec, Unit, dirname};
use crate::config::ResolvedConfig;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::Serialize;

/// Directory units are written to on first boot
pub const SYSTEMD_UNIT_DIR: &str = "/etc/systemd/system";

/// Directory holding the provision marker
pub const PROVISION_MARKER_DIR: &str = "/var/lib/osc";

/// Marker written once the provision script completed
pub const PROVISION_MARKER_FILE: &str = "/var/lib/osc/provision-osc-applied";

/// Packages installed by the provision script
pub const PROVISION_PACKAGES: &[&str] = &[
    "containerd",
    "runc",
    "docker.io",
    "socat",
    "nfs-common",
    "logrotate",
    "jq",
    "policykit-1",
];

/// Context for the provision script template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionContext {
    pub marker_dir: &'static str,
    pub marker_file: &'static str,
    pub unit_dir: &'static str,
    pub packages: &'static [&'static str],
    pub disable_unattended_upgrades: bool,
    pub files: Vec<FileContext>,
    pub units: Vec<UnitContext>,
}

/// A file as laid out in the provision script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContext {
    pub path: String,
    pub dirname: String,
    /// Base64 payload, or the plain payload without its final newline when
    /// `transmit_unencoded`
    pub content: String,
    pub transmit_unencoded: bool,
    /// Quoted heredoc delimiter for plain payloads
    pub delimiter: String,
    /// Octal mode, e.g. `0644`
    pub permissions: Option<String>,
}

/// A unit as laid out in the provision script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitContext {
    pub name: String,
    /// Base64 unit body
    pub content: Option<String>,
    pub drop_ins: Vec<DropInContext>,
    pub enable: bool,
}

/// A drop-in as laid out in the provision script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropInContext {
    pub name: String,
    /// Base64 drop-in body
    pub content: String,
}

/// Build the provision context, preserving file and unit order
pub fn build_provision_context(
    spec: &OperatingSystemConfigSpec,
    config: &ResolvedConfig,
) -> Result<ProvisionContext, ActuatorError> {
    let files = spec
        .files
        .iter()
        .map(build_file_context)
        .collect::<Result<Vec<_>, _>>()?;

    let units = spec
        .units
        .iter()
        .map(build_unit_context)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProvisionContext {
        marker_dir: PROVISION_MARKER_DIR,
        marker_file: PROVISION_MARKER_FILE,
        unit_dir: SYSTEMD_UNIT_DIR,
        packages: PROVISION_PACKAGES,
        disable_unattended_upgrades: config.disable_unattended_upgrades,
        files,
        units,
    })
}

fn build_file_context(file: &File) -> Result<FileContext, ActuatorError> {
    let transmit_unencoded = file.transmit_unencoded();
    let content = if transmit_unencoded {
        // The template terminates the payload line, so a final newline is not doubled
        let mut data = file.plain_data()?;
        if data.ends_with('\n') {
            data.pop();
        }
        data
    } else {
        file.base64_data()?
    };
    let delimiter = heredoc_delimiter(&content);

    Ok(FileContext {
        path: file.path.clone(),
        dirname: dirname(&file.path).to_string(),
        content,
        transmit_unencoded,
        delimiter,
        permissions: file.permissions.map(|mode| format!("{:04o}", mode)),
    })
}

fn build_unit_context(unit: &Unit) -> Result<UnitContext, ActuatorError> {
    unit.validate_name()?;

    let drop_ins = unit
        .drop_ins
        .iter()
        .map(|drop_in| -> Result<DropInContext, ActuatorError> {
            drop_in.validate_name(&unit.name)?;
            Ok(DropInContext {
                name: drop_in.name.clone(),
                content: BASE64.encode(drop_in.content.as_bytes()),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(UnitContext {
        name: unit.name.clone(),
        content: unit.content.as_ref().map(|c| BASE64.encode(c.as_bytes())),
        drop_ins,
        enable: unit.is_enabled(),
    })
}
