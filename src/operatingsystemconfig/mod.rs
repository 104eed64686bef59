//! OperatingSystemConfig actuator
//!
//! Dispatches on the OSC purpose:
//! - `provision`: renders the first-boot user-data script
//! - `reconcile`: returns the extension's systemd units and files

pub mod provision;
pub mod reconcile;

use crate::api::{File, InPlaceUpdatesStatus, OperatingSystemConfig, Purpose, Unit};
use crate::config::{ExtensionConfig, ResolvedConfig};
use crate::template::TemplateRenderer;
use crate::ActuatorError;
use serde::Serialize;
use tracing::{debug, info, info_span};

/// Result of reconciling an OperatingSystemConfig
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutput {
    /// Provision script; empty for the reconcile purpose
    #[serde(skip)]
    pub user_data: Vec<u8>,
    pub units: Vec<Unit>,
    pub files: Vec<File>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_place_update_status: Option<InPlaceUpdatesStatus>,
}

/// Lifecycle hooks invoked by the extension controller
pub trait Actuator: Send + Sync {
    /// Render the artifacts for an OSC
    fn reconcile(&self, osc: &OperatingSystemConfig) -> Result<ReconcileOutput, ActuatorError>;

    /// Clean up after an OSC was deleted
    fn delete(&self, osc: &OperatingSystemConfig) -> Result<(), ActuatorError>;

    /// Clean up without waiting for dependents
    fn force_delete(&self, osc: &OperatingSystemConfig) -> Result<(), ActuatorError>;

    /// Prepare an OSC for migration to another seed
    fn migrate(&self, osc: &OperatingSystemConfig) -> Result<(), ActuatorError>;

    /// Re-create artifacts after a migration
    fn restore(&self, osc: &OperatingSystemConfig) -> Result<ReconcileOutput, ActuatorError> {
        self.reconcile(osc)
    }
}

/// Actuator for Ubuntu worker nodes
#[derive(Debug, Clone)]
pub struct UbuntuActuator {
    config: ResolvedConfig,
    renderer: TemplateRenderer,
}

impl UbuntuActuator {
    /// Create an actuator from the extension config
    pub fn new(config: &ExtensionConfig) -> Result<Self, ActuatorError> {
        Ok(Self {
            config: config.resolve()?,
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Resolved configuration this actuator renders with
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }
}

impl Actuator for UbuntuActuator {
    fn reconcile(&self, osc: &OperatingSystemConfig) -> Result<ReconcileOutput, ActuatorError> {
        let purpose = osc.spec.purpose;
        let span = info_span!(
            "reconcile",
            name = osc.metadata.name.as_deref().unwrap_or_default(),
            namespace = osc.metadata.namespace.as_deref().unwrap_or_default(),
            %purpose,
        );
        let _enter = span.enter();

        match purpose {
            Purpose::Provision => {
                let user_data = provision::build_user_data(&self.renderer, &osc.spec, &self.config)?;
                info!("Rendered provision user-data ({} bytes)", user_data.len());
                Ok(ReconcileOutput {
                    user_data,
                    ..Default::default()
                })
            }
            Purpose::Reconcile => {
                let (units, files) = reconcile::build_extension_artifacts(&self.renderer, &self.config)?;
                info!(
                    "Rendered {} extension units and {} extension files",
                    units.len(),
                    files.len()
                );
                Ok(ReconcileOutput {
                    units,
                    files,
                    ..Default::default()
                })
            }
        }
    }

    fn delete(&self, osc: &OperatingSystemConfig) -> Result<(), ActuatorError> {
        debug!("Nothing to delete for {:?}", osc.metadata.name);
        Ok(())
    }

    fn force_delete(&self, osc: &OperatingSystemConfig) -> Result<(), ActuatorError> {
        self.delete(osc)
    }

    fn migrate(&self, osc: &OperatingSystemConfig) -> Result<(), ActuatorError> {
        debug!("Nothing to migrate for {:?}", osc.metadata.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperatingSystemConfigSpec;

    fn osc(purpose: Purpose) -> OperatingSystemConfig {
        OperatingSystemConfig {
            spec: OperatingSystemConfigSpec {
                purpose,
                units: vec![Unit {
                    name: "some-unit".to_string(),
                    content: Some("foo".to_string()),
                    ..Default::default()
                }],
                files: vec![File::inline("/some/file", None, "bar")],
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_provision_returns_only_user_data() {
        let actuator = UbuntuActuator::new(&ExtensionConfig::default()).unwrap();
        let output = actuator.reconcile(&osc(Purpose::Provision)).unwrap();

        assert!(!output.user_data.is_empty());
        assert!(output.units.is_empty());
        assert!(output.files.is_empty());
        assert!(output.in_place_update_status.is_none());
    }

    #[test]
    fn test_reconcile_returns_only_artifacts() {
        let actuator = UbuntuActuator::new(&ExtensionConfig::default()).unwrap();
        let output = actuator.reconcile(&osc(Purpose::Reconcile)).unwrap();

        assert!(output.user_data.is_empty());
        assert_eq!(output.units.len(), 2);
        assert_eq!(output.files.len(), 2);
        assert!(output.in_place_update_status.is_none());
    }

    #[test]
    fn test_restore_matches_reconcile() {
        let actuator = UbuntuActuator::new(&ExtensionConfig::default()).unwrap();
        for purpose in [Purpose::Provision, Purpose::Reconcile] {
            let osc = osc(purpose);
            assert_eq!(actuator.restore(&osc).unwrap(), actuator.reconcile(&osc).unwrap());
        }
    }

    #[test]
    fn test_lifecycle_noops() {
        let actuator = UbuntuActuator::new(&ExtensionConfig::default()).unwrap();
        let osc = osc(Purpose::Reconcile);

        assert!(actuator.delete(&osc).is_ok());
        assert!(actuator.force_delete(&osc).is_ok());
        assert!(actuator.migrate(&osc).is_ok());
    }

    #[test]
    fn test_actuator_is_object_safe() {
        let actuator: Box<dyn Actuator> =
            Box::new(UbuntuActuator::new(&ExtensionConfig::default()).unwrap());
        assert!(actuator.reconcile(&osc(Purpose::Reconcile)).is_ok());
    }
}
