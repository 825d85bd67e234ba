//! Plugin manifest definition

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::errors::{PluginError, PluginResult};

/// Manifests that only expose commands
pub const LEGACY_SCHEMA: u32 = 0;
/// Manifests exposing commands and message handlers
pub const CURRENT_SCHEMA: u32 = 1;

/// A plugin source unit as written on disk.
///
/// `schema-version` is required and selects how the rest is read.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginManifest {
    pub schema_version: u32,

    pub commands: Vec<CommandSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handlers: Option<Vec<HandlerSpec>>,
}

/// One command entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandSpec {
    pub command: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Long-form documentation shown by `/help <command>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(flatten)]
    pub action: Action,
}

/// One freeform message handler entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HandlerSpec {
    pub regex: String,

    #[serde(flatten)]
    pub action: Action,
}

/// What happens when an entry fires
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Reply with a fixed text
    Reply(String),
    /// Run a handler registered in the catalog under this name
    Handler(String),
}

/// Validated view of a manifest, selected by its schema version
#[derive(Debug, Clone, Copy)]
pub enum ManifestShape<'a> {
    Legacy {
        commands: &'a [CommandSpec],
    },
    Modern {
        commands: &'a [CommandSpec],
        handlers: &'a [HandlerSpec],
    },
}

impl PluginManifest {
    pub fn from_file(path: impl AsRef<Path>) -> PluginResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PluginError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> PluginResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| PluginError::Manifest(format!("Failed to parse manifest: {}", e)))
    }

    pub fn shape(&self) -> PluginResult<ManifestShape<'_>> {
        match self.schema_version {
            LEGACY_SCHEMA => {
                if self.handlers.is_some() {
                    return Err(PluginError::LegacyHandlers);
                }
                Ok(ManifestShape::Legacy { commands: &self.commands })
            }
            CURRENT_SCHEMA => {
                let handlers = self.handlers.as_deref().ok_or_else(|| {
                    PluginError::Manifest("schema-version 1 requires a `handlers` list".to_string())
                })?;
                Ok(ManifestShape::Modern {
                    commands: &self.commands,
                    handlers,
                })
            }
            other => Err(PluginError::UnsupportedVersion(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legacy() {
        let manifest = PluginManifest::parse(
            r#"
schema-version: 0
commands:
  - command: /cash
    description: shows cash
    reply: "No cash."
  - command: /echo
    hidden: true
    handler: echo
"#,
        )
        .unwrap();

        let ManifestShape::Legacy { commands } = manifest.shape().unwrap() else {
            panic!("expected legacy shape");
        };
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].description.as_deref(), Some("shows cash"));
        assert_eq!(commands[0].action, Action::Reply("No cash.".to_string()));
        assert!(!commands[0].hidden);
        assert!(commands[1].hidden);
        assert_eq!(commands[1].action, Action::Handler("echo".to_string()));
    }

    #[test]
    fn test_parse_modern() {
        let manifest = PluginManifest::parse(
            r#"
schema-version: 1
commands: []
handlers:
  - regex: "(?i)hello"
    reply: Hi!
"#,
        )
        .unwrap();

        let ManifestShape::Modern { commands, handlers } = manifest.shape().unwrap() else {
            panic!("expected modern shape");
        };
        assert!(commands.is_empty());
        assert_eq!(handlers[0].regex, "(?i)hello");
        assert_eq!(handlers[0].action, Action::Reply("Hi!".to_string()));
    }

    #[test]
    fn test_schema_version_is_required() {
        let err = PluginManifest::parse("commands: []").unwrap_err();
        assert!(matches!(err, PluginError::Manifest(_)));
    }

    #[test]
    fn test_entry_needs_an_action() {
        let err = PluginManifest::parse("schema-version: 0\ncommands:\n  - command: /cash\n").unwrap_err();
        assert!(matches!(err, PluginError::Manifest(_)));
    }

    #[test]
    fn test_shape_rejections() {
        let legacy_with_handlers = PluginManifest::parse("schema-version: 0\ncommands: []\nhandlers: []\n").unwrap();
        assert!(matches!(legacy_with_handlers.shape(), Err(PluginError::LegacyHandlers)));

        let modern_without_handlers = PluginManifest::parse("schema-version: 1\ncommands: []\n").unwrap();
        assert!(matches!(modern_without_handlers.shape(), Err(PluginError::Manifest(_))));

        let future = PluginManifest::parse("schema-version: 7\ncommands: []\n").unwrap();
        assert!(matches!(future.shape(), Err(PluginError::UnsupportedVersion(7))));
    }
}
