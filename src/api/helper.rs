//! Payload helpers for files and units

use super::{DropIn, File, Unit};
use crate::ActuatorError;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

/// Encoding marker for base64 inline data
pub const ENCODING_BASE64: &str = "b64";

/// Characters that would break out of a quoted shell word or a script line
const SHELL_UNSAFE_CHARS: &[char] = &['"', '\'', '$', '`', '\\', '\n', '\r'];

/// First character that is not safe inside a quoted word of the provision script
pub fn find_shell_unsafe_char(value: &str) -> Option<char> {
    value.chars().find(|c| SHELL_UNSAFE_CHARS.contains(c))
}

/// Heredoc delimiter that does not occur as a line of `content`
pub fn heredoc_delimiter(content: &str) -> String {
    let mut delimiter = String::from("EOF");
    while content.lines().any(|line| line == delimiter) {
        delimiter.push('_');
    }
    delimiter
}

/// Directory portion of a path, following POSIX `dirname`
///
/// `/some/file` → `/some`, `/file` → `/`, `file` → `.`
pub fn dirname(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }

    match trimmed.rfind('/') {
        None => ".",
        Some(idx) => {
            let dir = trimmed[..idx].trim_end_matches('/');
            if dir.is_empty() { "/" } else { dir }
        }
    }
}

impl File {
    /// Base64 payload for a `base64 -d` heredoc
    pub fn base64_data(&self) -> Result<String, ActuatorError> {
        let inline = self.inline_content()?;

        match inline.encoding.as_str() {
            "" => Ok(BASE64.encode(inline.data.as_bytes())),
            ENCODING_BASE64 => {
                let cleaned: String = inline.data.chars().filter(|c| !c.is_whitespace()).collect();
                BASE64
                    .decode(&cleaned)
                    .map_err(|e| ActuatorError::file_content(&self.path, format!("invalid base64: {}", e)))?;
                Ok(cleaned)
            }
            other => Err(unknown_encoding(&self.path, other)),
        }
    }

    /// Decoded payload for a plain heredoc
    pub fn plain_data(&self) -> Result<String, ActuatorError> {
        let inline = self.inline_content()?;

        match inline.encoding.as_str() {
            "" => Ok(inline.data.clone()),
            ENCODING_BASE64 => {
                let cleaned: String = inline.data.chars().filter(|c| !c.is_whitespace()).collect();
                let decoded = BASE64
                    .decode(&cleaned)
                    .map_err(|e| ActuatorError::file_content(&self.path, format!("invalid base64: {}", e)))?;
                String::from_utf8(decoded)
                    .map_err(|e| ActuatorError::file_content(&self.path, format!("invalid UTF-8: {}", e)))
            }
            other => Err(unknown_encoding(&self.path, other)),
        }
    }

    /// Whether the payload is written without base64 transport
    pub fn transmit_unencoded(&self) -> bool {
        self.content.transmit_unencoded == Some(true)
    }

    /// Check the path is usable as a double-quoted shell word
    pub fn validate_path(&self) -> Result<(), ActuatorError> {
        if self.path.is_empty() {
            return Err(ActuatorError::file_content("", "path must not be empty"));
        }
        if let Some(c) = find_shell_unsafe_char(&self.path) {
            return Err(ActuatorError::file_content(
                &self.path,
                format!("path must not contain {:?}", c),
            ));
        }
        Ok(())
    }

    fn inline_content(&self) -> Result<&super::FileContentInline, ActuatorError> {
        self.validate_path()?;
        self.content
            .inline
            .as_ref()
            .ok_or_else(|| ActuatorError::file_content(&self.path, "only inline content is supported"))
    }
}

impl DropIn {
    /// Same rules as unit names; errors are reported against `unit`
    pub fn validate_name(&self, unit: &str) -> Result<(), ActuatorError> {
        validate_component(&self.name).map_err(|message| {
            ActuatorError::unit(unit, format!("drop-in '{}': {}", self.name, message))
        })
    }
}

fn validate_component(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name must not be empty".to_string());
    }
    if name.contains('/') {
        return Err("name must not contain '/'".to_string());
    }
    if let Some(c) = find_shell_unsafe_char(name) {
        return Err(format!("name must not contain {:?}", c));
    }
    Ok(())
}

fn unknown_encoding(path: &str, encoding: &str) -> ActuatorError {
    ActuatorError::file_content(path, format!("unknown encoding '{}'", encoding))
}

impl Unit {
    /// Check the name is usable as a path component and a quoted shell word
    pub fn validate_name(&self) -> Result<(), ActuatorError> {
        validate_component(&self.name).map_err(|message| ActuatorError::unit(&self.name, message))
    }

    /// Enabled unless explicitly disabled
    pub fn is_enabled(&self) -> bool {
        self.enable.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FileContent, FileContentInline};

    fn b64_file(data: &str) -> File {
        File {
            path: "/etc/foo".to_string(),
            permissions: None,
            content: FileContent {
                inline: Some(FileContentInline {
                    encoding: ENCODING_BASE64.to_string(),
                    data: data.to_string(),
                }),
                transmit_unencoded: None,
            },
        }
    }

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("/some/file"), "/some");
        assert_eq!(dirname("/a/b/c.conf"), "/a/b");
        assert_eq!(dirname("/file"), "/");
        assert_eq!(dirname("file"), ".");
        assert_eq!(dirname(""), ".");
        assert_eq!(dirname("/"), "/");
        assert_eq!(dirname("/etc/dir/"), "/etc");
        assert_eq!(dirname("/etc//file"), "/etc");
    }

    #[test]
    fn test_base64_of_plain_data() {
        let file = File::inline("/some/file", None, "bar");
        assert_eq!(file.base64_data().unwrap(), "YmFy");
    }

    #[test]
    fn test_base64_data_passthrough() {
        let file = b64_file("YmFy\nYmF6\n");
        // "bar" + "baz" base64 split across lines
        assert_eq!(file.base64_data().unwrap(), "YmFyYmF6");
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let err = b64_file("not base64!").base64_data().unwrap_err();
        assert!(matches!(err, ActuatorError::FileContent { .. }));
    }

    #[test]
    fn test_plain_data_decodes_base64() {
        assert_eq!(b64_file("YmFy").plain_data().unwrap(), "bar");
        assert_eq!(File::inline("/x", None, "raw").plain_data().unwrap(), "raw");
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let mut file = File::inline("/x", None, "data");
        file.content.inline.as_mut().unwrap().encoding = "gzip".to_string();

        let err = file.base64_data().unwrap_err();
        assert!(err.to_string().contains("unknown encoding 'gzip'"));
    }

    #[test]
    fn test_missing_inline_content_rejected() {
        let file = File {
            path: "/x".to_string(),
            ..Default::default()
        };
        assert!(file.base64_data().is_err());
    }

    #[test]
    fn test_unit_name_validation() {
        let mut unit = Unit {
            name: "kubelet.service".to_string(),
            ..Default::default()
        };
        assert!(unit.validate_name().is_ok());

        unit.name = String::new();
        assert!(unit.validate_name().is_err());

        unit.name = "../evil".to_string();
        assert!(unit.validate_name().is_err());

        unit.name = "it's.service".to_string();
        assert!(unit.validate_name().is_err());
    }

    #[test]
    fn test_unit_name_rejects_shell_characters() {
        for name in ["x$(reboot).service", "a\"b.service", "a`id`.service", "a\\b.service", "a\nb.service"] {
            let unit = Unit {
                name: name.to_string(),
                ..Default::default()
            };
            let err = unit.validate_name().unwrap_err();
            assert!(matches!(err, ActuatorError::Unit { .. }), "{name} accepted");
        }
    }

    #[test]
    fn test_file_path_rejects_shell_characters() {
        for path in [
            "/tmp/a\"; touch /tmp/x; \"",
            "/etc/$HOME",
            "/etc/`id`",
            "/etc/a\\b",
            "/etc/a\nb",
            "/etc/it's",
        ] {
            let file = File::inline(path, None, "data");
            assert!(file.validate_path().is_err(), "{path:?} accepted");
            assert!(matches!(file.base64_data(), Err(ActuatorError::FileContent { .. })));
        }
        assert!(File::inline("/etc/ok-file_1.conf", None, "x").validate_path().is_ok());
    }

    #[test]
    fn test_drop_in_name_validation() {
        let drop_in = DropIn {
            name: "10-$(id).conf".to_string(),
            content: String::new(),
        };
        let err = drop_in.validate_name("kubelet.service").unwrap_err();
        assert!(err.to_string().contains("kubelet.service"));

        let drop_in = DropIn {
            name: "10-env.conf".to_string(),
            content: String::new(),
        };
        assert!(drop_in.validate_name("kubelet.service").is_ok());
    }

    #[test]
    fn test_heredoc_delimiter() {
        assert_eq!(heredoc_delimiter("plain\ntext\n"), "EOF");
        assert_eq!(heredoc_delimiter("a\nEOF\nb"), "EOF_");
        assert_eq!(heredoc_delimiter("EOF\nEOF_\n"), "EOF__");
        assert_eq!(heredoc_delimiter("  EOF\n"), "EOF");
    }

    #[test]
    fn test_unit_enabled_by_default() {
        let mut unit = Unit::default();
        assert!(unit.is_enabled());
        unit.enable = Some(false);
        assert!(!unit.is_enabled());
    }
}
