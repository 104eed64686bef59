//! Extension config resolution
//!
//! Merges a possibly sparse [`ExtensionConfig`] with defaults:
//! 1. `disableUnattendedUpgrades` defaults to `false`
//! 2. `ntp.daemon` defaults to `systemd-timesyncd`
//! 3. `ntp.ntpd.servers` defaults to an empty list

use super::{ExtensionConfig, NtpDaemon};
use crate::ActuatorError;
use serde::Serialize;
use tracing::{debug, warn};

/// Fully defaulted extension configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub disable_unattended_upgrades: bool,
    pub ntp_daemon: NtpDaemon,
    pub ntpd_servers: Vec<String>,
}

/// Resolve an extension config against defaults
pub fn resolve(config: &ExtensionConfig) -> Result<ResolvedConfig, ActuatorError> {
    let mut resolved = ResolvedConfig {
        disable_unattended_upgrades: config.disable_unattended_upgrades.unwrap_or(false),
        ..ResolvedConfig::default()
    };

    if let Some(ntp) = &config.ntp {
        resolved.ntp_daemon = ntp.daemon;

        if let Some(ntpd) = &ntp.ntpd {
            if let Some(idx) = ntpd.servers.iter().position(|s| s.trim().is_empty()) {
                return Err(ActuatorError::Config(format!(
                    "ntp.ntpd.servers[{}] must not be empty",
                    idx
                )));
            }

            if ntp.daemon != NtpDaemon::Ntpd && !ntpd.servers.is_empty() {
                warn!(
                    "ntpd servers configured but daemon is {}, servers are ignored",
                    ntp.daemon
                );
            }

            resolved.ntpd_servers = ntpd.servers.clone();
        }
    }

    debug!(
        "Resolved extension config: disable_unattended_upgrades={}, ntp_daemon={}",
        resolved.disable_unattended_upgrades, resolved.ntp_daemon
    );

    Ok(resolved)
}
