use std::collections::HashSet;

use super::{ChatId, CommandBinding, MessageBinding};

/// Health of a loaded plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginState {
    Ok,
    Error { reason: String },
}

impl PluginState {
    pub fn is_ok(&self) -> bool {
        matches!(self, PluginState::Ok)
    }

    /// Status glyph shown in the plugin list
    pub fn glyph(&self) -> &'static str {
        match self {
            PluginState::Ok => "✅",
            PluginState::Error { .. } => "⛔",
        }
    }
}

/// One entry of the plugin registry.
///
/// A descriptor in the `Error` state never carries commands or message
/// handlers; [`PluginDescriptor::failed`] is the only way to build one.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    name: String,
    state: PluginState,
    commands: Vec<CommandBinding>,
    message_handlers: Vec<MessageBinding>,
    disabled_in: HashSet<ChatId>,
}

impl PluginDescriptor {
    pub fn loaded(
        name: impl Into<String>,
        commands: Vec<CommandBinding>,
        message_handlers: Vec<MessageBinding>,
    ) -> Self {
        Self {
            name: name.into(),
            state: PluginState::Ok,
            commands,
            message_handlers,
            disabled_in: HashSet::new(),
        }
    }

    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: PluginState::Error { reason: reason.into() },
            commands: Vec::new(),
            message_handlers: Vec::new(),
            disabled_in: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &PluginState {
        &self.state
    }

    pub fn commands(&self) -> &[CommandBinding] {
        &self.commands
    }

    pub fn message_handlers(&self) -> &[MessageBinding] {
        &self.message_handlers
    }

    pub fn is_disabled_in(&self, chat_id: ChatId) -> bool {
        self.disabled_in.contains(&chat_id)
    }

    pub fn disabled_in(&self) -> &HashSet<ChatId> {
        &self.disabled_in
    }

    /// Returns true if the chat was not already disabled
    pub fn disable_in(&mut self, chat_id: ChatId) -> bool {
        self.disabled_in.insert(chat_id)
    }

    /// Returns true if the chat was disabled before
    pub fn enable_in(&mut self, chat_id: ChatId) -> bool {
        self.disabled_in.remove(&chat_id)
    }

    /// `<glyph><name>` line used by the plugin list
    pub fn status_line(&self) -> String {
        format!("{}{}", self.state.glyph(), self.name)
    }
}
