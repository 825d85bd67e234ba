//! Plugin registry - Manages loaded plugins

use std::path::Path;
use std::sync::Arc;

use crate::application::errors::{PluginError, PluginResult};
use crate::domain::entities::{ChatId, PluginDescriptor};
use crate::plugins::Plugin;
use super::loader::{plugin_name, PluginLoader};

/// Ordered collection of plugin descriptors.
///
/// Registration order is routing priority. The core plugin, when set, is
/// appended last on every full reload.
pub struct PluginRegistry {
    plugins: Vec<PluginDescriptor>,
    loader: PluginLoader,
    core: Option<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new(loader: PluginLoader) -> Self {
        Self {
            plugins: Vec::new(),
            loader,
            core: None,
        }
    }

    pub fn with_core(mut self, core: Arc<dyn Plugin>) -> Self {
        self.core = Some(core);
        self
    }

    pub fn loader(&self) -> &PluginLoader {
        &self.loader
    }

    /// Rebuild the registry from the plugin directory.
    ///
    /// The new sequence is built aside and swapped in whole. Disabled-chat
    /// sets of the previous generation are dropped.
    pub fn load_all(&mut self) {
        tracing::info!("Loading plugins from {}", self.loader.plugin_dir().display());

        let mut fresh = Vec::new();
        match self.loader.discover() {
            Ok(paths) => {
                for path in paths {
                    fresh.push(self.build(&path));
                }
            }
            Err(e) => tracing::warn!("Failed to scan plugin directory: {}", e),
        }

        if let Some(core) = &self.core {
            fresh.push(core.descriptor());
        }

        self.plugins = fresh;

        let failed = self.plugins.iter().filter(|p| !p.state().is_ok()).count();
        tracing::info!("Plugin registry ready: {} loaded, {} failed", self.plugins.len() - failed, failed);
    }

    /// Load one manifest and append it. Failures become an error entry.
    pub fn load_one(&mut self, path: impl AsRef<Path>) -> &PluginDescriptor {
        let descriptor = self.build(path.as_ref());
        self.push(descriptor)
    }

    /// Append a compiled-in plugin
    pub fn register(&mut self, plugin: &dyn Plugin) -> &PluginDescriptor {
        tracing::info!("Registering plugin: {}", plugin.name());
        self.push(plugin.descriptor())
    }

    fn push(&mut self, descriptor: PluginDescriptor) -> &PluginDescriptor {
        let index = self.plugins.len();
        self.plugins.push(descriptor);
        &self.plugins[index]
    }

    fn build(&self, path: &Path) -> PluginDescriptor {
        match self.loader.load_plugin(path) {
            Ok(plugin) => plugin.descriptor(),
            Err(e) => {
                let name = plugin_name(path);
                tracing::warn!("Plugin {} failed to init cause of {}", name, e);
                PluginDescriptor::failed(name, e.to_string())
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.plugins.iter()
    }

    /// First descriptor with this name
    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    /// Suppress a plugin's commands in one chat
    pub fn disable_in(&mut self, name: &str, chat_id: ChatId) -> PluginResult<bool> {
        let plugin = self.get_mut(name)?;
        tracing::debug!("Disabling plugin {} in chat {}", name, chat_id);
        Ok(plugin.disable_in(chat_id))
    }

    pub fn enable_in(&mut self, name: &str, chat_id: ChatId) -> PluginResult<bool> {
        let plugin = self.get_mut(name)?;
        tracing::debug!("Enabling plugin {} in chat {}", name, chat_id);
        Ok(plugin.enable_in(chat_id))
    }

    fn get_mut(&mut self, name: &str) -> PluginResult<&mut PluginDescriptor> {
        self.plugins
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| PluginError::NotFound(name.to_string()))
    }

    /// `<glyph><name>` per plugin, reverse-sorted
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.plugins.iter().map(PluginDescriptor::status_line).collect();
        lines.sort();
        lines.reverse();
        lines
    }

    /// Get the number of registered plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CommandBinding, PluginState};
    use crate::infrastructure::plugins::HandlerCatalog;
    use crate::plugins::StaticPlugin;
    use std::fs;
    use tempfile::TempDir;

    const CASH: &str = "schema-version: 0\ncommands:\n  - command: /cash\n    description: shows cash\n    reply: none\n";

    fn core() -> Arc<dyn Plugin> {
        Arc::new(StaticPlugin::new("Core Plugin").with_command(CommandBinding::new("/start", |_| Ok(None))))
    }

    fn registry(dir: &Path) -> PluginRegistry {
        PluginRegistry::new(PluginLoader::new(dir, HandlerCatalog::with_defaults())).with_core(core())
    }

    fn names(registry: &PluginRegistry) -> Vec<&str> {
        registry.iter().map(PluginDescriptor::name).collect()
    }

    #[test]
    fn test_load_all_empty_dir_keeps_core_last() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry(dir.path());
        registry.load_all();
        assert_eq!(names(&registry), vec!["Core Plugin"]);

        let mut missing = registry_for_missing();
        missing.load_all();
        assert_eq!(names(&missing), vec!["Core Plugin"]);
    }

    fn registry_for_missing() -> PluginRegistry {
        registry(Path::new("/definitely/not/here"))
    }

    #[test]
    fn test_load_all_mixed_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cash.yaml"), CASH).unwrap();
        fs::write(dir.path().join("broken.yaml"), "schema-version: 9\ncommands: []\n").unwrap();

        let mut registry = registry(dir.path());
        registry.load_all();

        assert_eq!(names(&registry), vec!["broken", "cash", "Core Plugin"]);
        let broken = registry.get("broken").unwrap();
        assert!(matches!(broken.state(), PluginState::Error { .. }));
        assert!(broken.commands().is_empty());
        assert!(broken.message_handlers().is_empty());
        assert_eq!(registry.get("cash").unwrap().commands()[0].command, "/cash");
    }

    #[test]
    fn test_load_all_replaces_and_resets_disabled_chats() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cash.yaml"), CASH).unwrap();

        let mut registry = registry(dir.path());
        registry.load_all();
        assert!(registry.disable_in("cash", 5).unwrap());
        assert!(!registry.disable_in("cash", 5).unwrap());
        registry.load_one(dir.path().join("cash.yaml"));
        assert_eq!(registry.len(), 3);

        registry.load_all();
        assert_eq!(registry.len(), 2);
        assert!(!registry.get("cash").unwrap().is_disabled_in(5));
    }

    #[test]
    fn test_load_one_failure_appends_error_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exploding.yaml");
        fs::write(&path, "schema-version: 1\ncommands:\n  - command: /boom\n    handler: missing\nhandlers: []\n").unwrap();

        let mut registry = registry(dir.path());
        registry.load_all();
        let before = registry.len();

        let descriptor = registry.load_one(&path);
        assert_eq!(descriptor.name(), "exploding");
        assert!(!descriptor.state().is_ok());
        assert!(descriptor.commands().is_empty());
        assert_eq!(registry.len(), before + 1);
    }

    #[test]
    fn test_enable_disable_unknown_plugin() {
        let mut registry = registry_for_missing();
        registry.load_all();
        assert!(matches!(registry.disable_in("ghost", 1), Err(PluginError::NotFound(_))));
        assert!(registry.disable_in("Core Plugin", 1).unwrap());
        assert!(registry.enable_in("Core Plugin", 1).unwrap());
        assert!(!registry.enable_in("Core Plugin", 1).unwrap());
    }

    #[test]
    fn test_status_lines_reverse_sorted() {
        let mut registry = registry_for_missing();
        registry.register(&StaticPlugin::new("alpha"));
        registry.load_one("/definitely/not/here/zulu.yaml");
        registry.register(&StaticPlugin::new("mike"));

        // ✅ (U+2705) sorts above ⛔ (U+26D4)
        assert_eq!(registry.status_lines(), vec!["✅mike", "✅alpha", "⛔zulu"]);
    }
}
