//! Jinja2-compatible template rendering
//!
//! Renders the provision script and the generated systemd units. Templates
//! are embedded at compile time and use block trimming, so a line holding
//! only a `{% ... %}` tag produces no output. Output is byte-exact: the
//! trailing newline of each template is kept.

pub mod context;

pub use context::{DropInContext, FileContext, ProvisionContext, UnitContext, build_provision_context};

use crate::ActuatorError;
use minijinja::Environment;
use serde::Serialize;
use tracing::debug;

/// Template for the provision user-data script
pub const PROVISION_SCRIPT: &str = "provision.sh";

/// Template for the NTP installer unit
pub const INSTALL_NTP_CLIENT_UNIT: &str = "install-ntp-client.service";

const TEMPLATES: &[(&str, &str)] = &[
    (PROVISION_SCRIPT, include_str!("templates/provision.sh.j2")),
    (
        INSTALL_NTP_CLIENT_UNIT,
        include_str!("templates/install-ntp-client.service.j2"),
    ),
];

/// Template renderer holding the pre-compiled templates
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer with all embedded templates loaded
    pub fn new() -> Result<Self, ActuatorError> {
        let mut env = new_environment();

        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self { env })
    }

    /// Render a named template with a serializable context
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, ActuatorError> {
        debug!("Rendering template {}", name);

        let tmpl = self.env.get_template(name)?;
        Ok(tmpl.render(context)?)
    }
}

fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    fn render_str<S: Serialize>(template: &str, context: S) -> Result<String, ActuatorError> {
        Ok(new_environment().render_str(template, context)?)
    }

    #[test]
    fn test_renderer_loads_embedded_templates() {
        let renderer = TemplateRenderer::new().unwrap();
        let unit = renderer
            .render(
                INSTALL_NTP_CLIENT_UNIT,
                context! { script_path => "/opt/bin/ntp.sh", daemon => "ntpd" },
            )
            .unwrap();

        assert!(unit.contains("ExecStart=/bin/bash /opt/bin/ntp.sh ntpd\n"));
        assert!(unit.ends_with("WantedBy=multi-user.target\n"));
    }

    #[test]
    fn test_unknown_template() {
        let renderer = TemplateRenderer::new().unwrap();
        let result = renderer.render("missing.sh", context! {});
        assert!(matches!(result, Err(ActuatorError::Template(_))));
    }

    #[test]
    fn test_block_lines_are_trimmed() {
        let template = "a\n{% if flag %}\nb\n{% endif %}\nc\n";
        assert_eq!(render_str(template, context! { flag => true }).unwrap(), "a\nb\nc\n");
        assert_eq!(render_str(template, context! { flag => false }).unwrap(), "a\nc\n");
    }

    #[test]
    fn test_trailing_newline_kept() {
        assert_eq!(render_str("x\n", context! {}).unwrap(), "x\n");
    }

    #[test]
    fn test_loop() {
        let template = "{% for pkg in packages %}\n- {{ pkg }}\n{% endfor %}\n";
        let rendered = render_str(template, context! { packages => vec!["jq", "socat"] }).unwrap();
        assert_eq!(rendered, "- jq\n- socat\n");
    }

    #[test]
    fn test_render_invalid_syntax() {
        let result = render_str("value: {{ invalid", context! {});
        assert!(result.is_err());
    }

    #[test]
    fn test_no_html_escaping() {
        let rendered = render_str("{{ v }}", context! { v => "<a & 'b'>" }).unwrap();
        assert_eq!(rendered, "<a & 'b'>");
    }
}
