//! Reconcile artifact builder
//!
//! Produces the systemd units and helper files the extension contributes on
//! every reconciliation. The artifacts do not depend on the OSC's own units
//! and files; only the NTP daemon selection changes the output.

use crate::ActuatorError;
use crate::api::{DropIn, File, Unit, UnitCommand};
use crate::config::ResolvedConfig;
use crate::template::{INSTALL_NTP_CLIENT_UNIT, TemplateRenderer};
use minijinja::context;
use tracing::debug;

/// Unit extended with the resolv.conf drop-in
pub const KUBELET_UNIT: &str = "kubelet.service";

/// Drop-in running the resolv.conf helper before kubelet starts
pub const KUBELET_RESOLV_CONF_DROP_IN: &str = "10-configure-resolv-conf.conf";

/// Helper rewriting kubelet's `resolvConf` to systemd-resolved's file
pub const KUBELET_RESOLV_CONF_SCRIPT_PATH: &str = "/opt/gardener/bin/configure_kubelet_resolv_conf.sh";

/// One-shot unit installing the NTP client
pub const INSTALL_NTP_CLIENT_UNIT_NAME: &str = "install-ntp-client.service";

/// NTP installer script
pub const INSTALL_NTP_SCRIPT_PATH: &str = "/opt/gardener/bin/install-ntp.sh";

/// Embedded NTP installer, called with the daemon name
pub const INSTALL_NTP_SCRIPT: &str = include_str!("scripts/install-ntp.sh");

const KUBELET_RESOLV_CONF_SCRIPT: &str = r#"#!/bin/bash
if grep -q 'resolvConf: /etc/resolv.conf' /var/lib/kubelet/config/kubelet; then
  sed -i -e 's|resolvConf: /etc/resolv.conf|resolvConf: /run/systemd/resolve/resolv.conf|g' /var/lib/kubelet/config/kubelet;
fi
"#;

/// Build the extension units and files for the reconcile purpose
pub fn build_extension_artifacts(
    renderer: &TemplateRenderer,
    config: &ResolvedConfig,
) -> Result<(Vec<Unit>, Vec<File>), ActuatorError> {
    debug!("Building reconcile artifacts for NTP daemon {}", config.ntp_daemon);

    let kubelet = Unit {
        name: KUBELET_UNIT.to_string(),
        drop_ins: vec![DropIn {
            name: KUBELET_RESOLV_CONF_DROP_IN.to_string(),
            content: format!("[Service]\nExecStartPre={}\n", KUBELET_RESOLV_CONF_SCRIPT_PATH),
        }],
        file_paths: vec![KUBELET_RESOLV_CONF_SCRIPT_PATH.to_string()],
        ..Default::default()
    };

    let install_ntp = Unit {
        name: INSTALL_NTP_CLIENT_UNIT_NAME.to_string(),
        command: Some(UnitCommand::Restart),
        content: Some(renderer.render(
            INSTALL_NTP_CLIENT_UNIT,
            context! {
                script_path => INSTALL_NTP_SCRIPT_PATH,
                daemon => config.ntp_daemon.as_str(),
            },
        )?),
        ..Default::default()
    };

    let files = vec![
        File::inline(
            KUBELET_RESOLV_CONF_SCRIPT_PATH,
            Some(0o755),
            KUBELET_RESOLV_CONF_SCRIPT,
        ),
        File::inline(INSTALL_NTP_SCRIPT_PATH, Some(0o744), INSTALL_NTP_SCRIPT),
    ];

    Ok((vec![kubelet, install_ntp], files))
}
