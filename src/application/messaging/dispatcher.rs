//! Message dispatcher - Routes updates to handlers

use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::{ChatId, Handler, InlineQuery, Message, Reply, Update};
use crate::domain::traits::{BotInfo, InlineAnswer};
use crate::infrastructure::plugins::PluginRegistry;
use super::context::Context;
use super::{parser, router};

/// Something the transport has to deliver after dispatching an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Message { chat_id: ChatId, reply: Reply },
    Inline { query_id: String, answers: Vec<InlineAnswer> },
}

/// Message dispatcher - owns the registry and runs routed handlers.
///
/// Updates are handled one at a time; a reload triggered by a handler
/// completes before the next update is routed.
pub struct MessageDispatcher {
    registry: PluginRegistry,
}

impl MessageDispatcher {
    pub fn new(registry: PluginRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    pub fn dispatch(&mut self, update: &Update, bot: &BotInfo) -> Vec<Outgoing> {
        match update {
            Update::Message(message) => self.dispatch_message(message, bot),
            Update::InlineQuery(query) => self.dispatch_inline(query, bot),
        }
    }

    /// Commands win; freeform handlers only see text no command claimed
    fn dispatch_message(&mut self, message: &Message, bot: &BotInfo) -> Vec<Outgoing> {
        let chat_id = message.chat.id;

        if let Some(binding) = router::route_command(&self.registry, &message.text, chat_id) {
            let handler = Arc::clone(&binding.handler);
            tracing::debug!("[{}] Routing to {}", chat_id, binding.command);

            let args = parser::command_args(&message.text);
            let mut ctx = Context::for_message(message, args, bot, &mut self.registry);
            return Self::invoke(&handler, &mut ctx)
                .into_iter()
                .map(|reply| Outgoing::Message { chat_id, reply })
                .collect();
        }

        let handlers: Vec<Handler> = router::route_message(&self.registry, &message.text)
            .into_iter()
            .map(|binding| Arc::clone(&binding.handler))
            .collect();
        if handlers.is_empty() {
            tracing::debug!("[{}] No handler matched", chat_id);
            return Vec::new();
        }

        let mut outgoing = Vec::new();
        for handler in handlers {
            let args = parser::message_words(&message.text);
            let mut ctx = Context::for_message(message, args, bot, &mut self.registry);
            outgoing.extend(
                Self::invoke(&handler, &mut ctx)
                    .into_iter()
                    .map(|reply| Outgoing::Message { chat_id, reply }),
            );
        }
        outgoing
    }

    fn dispatch_inline(&mut self, query: &InlineQuery, bot: &BotInfo) -> Vec<Outgoing> {
        let Some(binding) = router::route_inline(&self.registry, &query.query) else {
            tracing::debug!("No inline command for query {:?}", query.query);
            return Vec::new();
        };
        let handler = Arc::clone(&binding.handler);
        let command = binding.command.clone();

        let args = parser::inline_args(&query.query, &command);
        let mut ctx = Context::for_inline(query, args, bot, &mut self.registry);
        let answers: Vec<InlineAnswer> = Self::invoke(&handler, &mut ctx)
            .into_iter()
            .enumerate()
            .map(|(i, reply)| InlineAnswer {
                id: format!("{}-{}", query.id, i),
                title: command.clone(),
                reply,
            })
            .collect();

        if answers.is_empty() {
            return Vec::new();
        }
        vec![Outgoing::Inline {
            query_id: query.id.clone(),
            answers,
        }]
    }

    /// Run a handler; interim notices come first, errors become plain replies
    fn invoke(handler: &Handler, ctx: &mut Context<'_>) -> Vec<Reply> {
        let result = handler(ctx);
        let mut replies = ctx.take_notices();

        match result {
            Ok(Some(reply)) => replies.push(reply),
            Ok(None) => {}
            Err(CommandError::AccessDenied) => {
                tracing::debug!("Access denied for user {:?}", ctx.user_id());
                replies.push(Reply::text(CommandError::AccessDenied.to_string()));
            }
            Err(e) => {
                tracing::warn!("Handler failed: {}", e);
                replies.push(Reply::text(format!("Error: {}", e)));
            }
        }
        replies
    }
}
