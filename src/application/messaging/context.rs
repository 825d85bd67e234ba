//! Invocation context handed to every handler

use crate::domain::entities::{Chat, ChatId, InlineQuery, Message, Reply, User, UserId};
use crate::domain::traits::BotInfo;
use crate::infrastructure::plugins::PluginRegistry;

/// What a handler sees while it runs.
///
/// Handlers are looked up in the registry and cloned out before being
/// invoked, so the registry can be lent mutably here (core reload/load).
pub struct Context<'a> {
    pub chat: Option<&'a Chat>,
    pub sender: Option<&'a User>,
    pub text: &'a str,
    pub args: Vec<String>,
    pub bot: &'a BotInfo,
    pub registry: &'a mut PluginRegistry,
    notices: Vec<Reply>,
}

impl<'a> Context<'a> {
    pub fn for_message(
        message: &'a Message,
        args: Vec<String>,
        bot: &'a BotInfo,
        registry: &'a mut PluginRegistry,
    ) -> Self {
        Self {
            chat: Some(&message.chat),
            sender: message.sender.as_ref(),
            text: &message.text,
            args,
            bot,
            registry,
            notices: Vec::new(),
        }
    }

    pub fn for_inline(
        query: &'a InlineQuery,
        args: Vec<String>,
        bot: &'a BotInfo,
        registry: &'a mut PluginRegistry,
    ) -> Self {
        Self {
            chat: None,
            sender: Some(&query.from),
            text: &query.query,
            args,
            bot,
            registry,
            notices: Vec::new(),
        }
    }

    pub fn chat_id(&self) -> Option<ChatId> {
        self.chat.map(|c| c.id)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.sender.map(|u| u.id)
    }

    /// Inline queries have no chat and count as non-private
    pub fn is_private(&self) -> bool {
        self.chat.is_some_and(Chat::is_private)
    }

    /// Queue a reply that is sent before the handler's final reply
    pub fn notify(&mut self, reply: Reply) {
        self.notices.push(reply);
    }

    pub fn take_notices(&mut self) -> Vec<Reply> {
        std::mem::take(&mut self.notices)
    }
}
