use async_trait::async_trait;
use crate::domain::entities::{ChatId, Reply};
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Start the bot and begin listening for messages
    async fn start(&self) -> Result<(), BotError>;

    /// Send a reply to a chat, returning the platform message id
    async fn send_message(&self, chat_id: ChatId, reply: &Reply) -> Result<String, BotError>;

    /// Answer an inline query
    async fn answer_inline(&self, query_id: &str, answers: &[InlineAnswer]) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Keyboard button for inline keyboards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
    pub url: Option<String>,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// One article offered in response to an inline query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAnswer {
    pub id: String,
    pub title: String,
    pub reply: Reply,
}

/// Bot information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
