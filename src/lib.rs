//! os-ubuntu-rs library
//!
//! Renders Ubuntu node configuration from an `OperatingSystemConfig`:
//! a cloud-init user-data script for first boot (`provision`), or the
//! systemd units and files the extension contributes on every reconcile
//! (`reconcile`).
//!
//! # Design Principles
//!
//! - **Pure**: output depends only on the extension config and the OSC
//! - **Byte-exact**: rendered scripts are compared against golden text
//! - **Safe**: no unsafe code (`unsafe_code = "forbid"`)

pub mod api;
pub mod config;
pub mod operatingsystemconfig;
pub mod template;

mod error;

pub use api::{OperatingSystemConfig, Purpose};
pub use config::{ExtensionConfig, NtpDaemon, ResolvedConfig};
pub use error::ActuatorError;
pub use operatingsystemconfig::{Actuator, ReconcileOutput, UbuntuActuator};
