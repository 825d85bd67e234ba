//! Plugin loader - builds plugins from manifest files

use std::path::{Path, PathBuf};

use regex_lite::Regex;

use crate::application::errors::{PluginError, PluginResult};
use crate::domain::entities::{handler, CommandBinding, Handler, MessageBinding, Reply};
use crate::plugins::StaticPlugin;
use super::catalog::HandlerCatalog;
use super::manifest::{Action, CommandSpec, HandlerSpec, ManifestShape, PluginManifest};

const MANIFEST_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Registry name of the plugin at `path`: its file name without extension
pub fn plugin_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Plugin loader
#[derive(Debug, Clone)]
pub struct PluginLoader {
    plugin_dir: PathBuf,
    catalog: HandlerCatalog,
}

impl PluginLoader {
    pub fn new(plugin_dir: impl Into<PathBuf>, catalog: HandlerCatalog) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
            catalog,
        }
    }

    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    pub fn catalog(&self) -> &HandlerCatalog {
        &self.catalog
    }

    /// Manifest files in the plugin directory, sorted by file name.
    ///
    /// A missing directory yields no plugins.
    pub fn discover(&self) -> PluginResult<Vec<PathBuf>> {
        if !self.plugin_dir.exists() {
            tracing::warn!("Plugin directory does not exist: {}", self.plugin_dir.display());
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.plugin_dir).map_err(|source| PluginError::Io {
            path: self.plugin_dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            // Skip hidden files
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    continue;
                }
            }

            let is_manifest = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| MANIFEST_EXTENSIONS.contains(&e));
            if is_manifest {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }

    /// Load a single plugin from its manifest file
    pub fn load_plugin(&self, path: impl AsRef<Path>) -> PluginResult<StaticPlugin> {
        let path = path.as_ref();
        let name = plugin_name(path);
        let manifest = PluginManifest::from_file(path)?;

        let mut plugin = StaticPlugin::new(&name);
        match manifest.shape()? {
            ManifestShape::Legacy { commands } => {
                for spec in commands {
                    plugin = plugin.with_command(self.bind_command(spec)?);
                }
                tracing::info!("Legacy module {} loaded", name);
            }
            ManifestShape::Modern { commands, handlers } => {
                for spec in commands {
                    plugin = plugin.with_command(self.bind_command(spec)?);
                }
                for spec in handlers {
                    plugin = plugin.with_handler(self.bind_handler(spec)?);
                }
                tracing::info!("Module {} loaded", name);
            }
        }

        Ok(plugin)
    }

    fn bind_command(&self, spec: &CommandSpec) -> PluginResult<CommandBinding> {
        if !spec.command.starts_with('/') || spec.command.len() < 2 {
            return Err(PluginError::InvalidCommand(spec.command.clone()));
        }

        let mut binding = CommandBinding::from_handler(&spec.command, self.resolve(&spec.action)?)
            .hidden(spec.hidden);
        if let Some(description) = &spec.description {
            binding = binding.with_description(description);
        }
        if let Some(docs) = &spec.docs {
            binding = binding.with_docs(docs);
        }
        Ok(binding)
    }

    fn bind_handler(&self, spec: &HandlerSpec) -> PluginResult<MessageBinding> {
        let regex = Regex::new(&spec.regex).map_err(|e| PluginError::InvalidRegex {
            pattern: spec.regex.clone(),
            reason: e.to_string(),
        })?;
        Ok(MessageBinding::from_handler(regex, self.resolve(&spec.action)?))
    }

    fn resolve(&self, action: &Action) -> PluginResult<Handler> {
        match action {
            Action::Reply(text) => {
                let text = text.clone();
                Ok(handler(move |_| Ok(Some(Reply::text(text.clone())))))
            }
            Action::Handler(name) => self
                .catalog
                .get(name)
                .ok_or_else(|| PluginError::UnknownHandler(name.clone())),
        }
    }
}
