//! Provision script builder
//!
//! Produces the first-boot user-data script. Sections, in order:
//! 1. Idempotency guard on the provision marker
//! 2. cloud-init network management disabled
//! 3. OSC files, then OSC units (with drop-ins)
//! 4. Container runtime packages and containerd config
//! 5. Unattended-upgrades disabled (optional)
//! 6. systemd reload and unit enablement
//! 7. Provision marker written

use crate::ActuatorError;
use crate::api::OperatingSystemConfigSpec;
use crate::config::ResolvedConfig;
use crate::template::{PROVISION_SCRIPT, TemplateRenderer, build_provision_context};
use tracing::debug;

/// Render the provision user-data script
pub fn build_user_data(
    renderer: &TemplateRenderer,
    spec: &OperatingSystemConfigSpec,
    config: &ResolvedConfig,
) -> Result<Vec<u8>, ActuatorError> {
    let context = build_provision_context(spec, config)?;
    debug!(
        "Rendering provision script with {} files and {} units",
        context.files.len(),
        context.units.len()
    );

    let script = renderer.render(PROVISION_SCRIPT, &context)?;
    Ok(script.into_bytes())
}
