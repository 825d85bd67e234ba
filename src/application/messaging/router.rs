//! Routers - find the handlers an update should reach
//!
//! All three scan the registry in plugin-registration order and, within a
//! plugin, in binding order. Only the command router honours a plugin's
//! disabled-chat set.

use crate::domain::entities::{ChatId, CommandBinding, MessageBinding};
use crate::infrastructure::plugins::PluginRegistry;

/// First command binding addressed by a chat message, skipping plugins
/// disabled in `chat_id`. `None` is a no-op for the caller.
pub fn route_command<'r>(
    registry: &'r PluginRegistry,
    text: &str,
    chat_id: ChatId,
) -> Option<&'r CommandBinding> {
    registry
        .iter()
        .filter(|plugin| !plugin.is_disabled_in(chat_id))
        .flat_map(|plugin| plugin.commands())
        .find(|binding| binding.matches(text))
}

/// First command binding whose token prefixes the inline query
pub fn route_inline<'r>(registry: &'r PluginRegistry, query: &str) -> Option<&'r CommandBinding> {
    registry
        .iter()
        .flat_map(|plugin| plugin.commands())
        .find(|binding| binding.matches_inline(query))
}

/// Every message binding whose regex matches the start of `text`
pub fn route_message<'r>(registry: &'r PluginRegistry, text: &str) -> Vec<&'r MessageBinding> {
    registry
        .iter()
        .flat_map(|plugin| plugin.message_handlers())
        .filter(|binding| binding.matches(text))
        .collect()
}
