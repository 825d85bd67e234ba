//! Plugin trait definitions

use crate::domain::entities::{CommandBinding, MessageBinding, PluginDescriptor};

/// Core plugin trait that all plugins must implement
pub trait Plugin: Send + Sync {
    /// Unique identifier for the plugin
    fn name(&self) -> &str;

    /// Commands exposed to the command and inline routers, in priority order
    fn commands(&self) -> Vec<CommandBinding>;

    /// Optional: passive regex handlers for freeform messages
    fn handlers(&self) -> Vec<MessageBinding> {
        Vec::new()
    }

    /// Snapshot the plugin into a healthy registry entry
    fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::loaded(self.name(), self.commands(), self.handlers())
    }
}

/// Plugin whose bindings are fixed at construction time.
///
/// Manifest-backed plugins end up as one of these once their actions have
/// been resolved.
#[derive(Debug, Clone, Default)]
pub struct StaticPlugin {
    name: String,
    commands: Vec<CommandBinding>,
    handlers: Vec<MessageBinding>,
}

impl StaticPlugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
            handlers: Vec::new(),
        }
    }

    pub fn with_command(mut self, command: CommandBinding) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_handler(mut self, handler: MessageBinding) -> Self {
        self.handlers.push(handler);
        self
    }
}

impl Plugin for StaticPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn commands(&self) -> Vec<CommandBinding> {
        self.commands.clone()
    }

    fn handlers(&self) -> Vec<MessageBinding> {
        self.handlers.clone()
    }
}
