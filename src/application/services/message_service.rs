use crate::application::errors::BotError;
use crate::application::messaging::{MessageDispatcher, Outgoing};
use crate::domain::entities::Update;
use crate::domain::traits::Bot;

/// Service for processing updates: dispatch, then deliver through the bot
pub struct MessageService<B: Bot> {
    bot: B,
    dispatcher: MessageDispatcher,
}

impl<B: Bot> MessageService<B> {
    pub fn new(bot: B, dispatcher: MessageDispatcher) -> Self {
        Self { bot, dispatcher }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn dispatcher(&self) -> &MessageDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut MessageDispatcher {
        &mut self.dispatcher
    }

    /// Process an incoming update and send every resulting reply.
    ///
    /// Returns how many messages or inline answers were delivered.
    pub async fn process(&mut self, update: Update) -> Result<usize, BotError> {
        let info = self.bot.bot_info();
        let outgoing = self.dispatcher.dispatch(&update, &info);

        let mut sent = 0;
        for item in outgoing {
            match item {
                Outgoing::Message { chat_id, reply } => {
                    let id = self.bot.send_message(chat_id, &reply).await?;
                    tracing::debug!("[{}] Sent message {}", chat_id, id);
                }
                Outgoing::Inline { query_id, answers } => {
                    self.bot.answer_inline(&query_id, &answers).await?;
                    tracing::debug!("Answered inline query {} with {} results", query_id, answers.len());
                }
            }
            sent += 1;
        }
        Ok(sent)
    }
}
