//! Console adapter for development/testing

use async_trait::async_trait;
use crate::domain::entities::{Chat, ChatId, InlineQuery, Message, Reply, Update, User, UserId};
use crate::domain::traits::{Bot, BotInfo, InlineAnswer};
use crate::application::errors::BotError;

/// Console bot adapter for local development.
///
/// Every stdin line is a private message from the configured user. A line
/// starting with `@` is sent as an inline query instead.
pub struct ConsoleAdapter {
    info: BotInfo,
    user_id: UserId,
}

impl ConsoleAdapter {
    pub fn new(name: impl Into<String>, user_id: UserId) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: name.into(),
                username: "console".to_string(),
            },
            user_id,
        }
    }

    /// Turn an input line into an update; blank lines yield nothing
    pub fn to_update(&self, line: &str) -> Option<Update> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let user = User::new(self.user_id).with_username("console");
        if let Some(query) = line.strip_prefix('@') {
            return Some(Update::InlineQuery(InlineQuery {
                id: uuid::Uuid::new_v4().to_string(),
                from: user,
                query: query.trim().to_string(),
            }));
        }

        Some(Update::Message(
            Message::new(Chat::private(self.user_id), line)
                .with_sender(user)
                .with_platform("console"),
        ))
    }

    fn render(reply: &Reply) -> String {
        let mut out = format!("[BOT] {}", reply.text);
        for row in &reply.keyboard {
            let row_text: Vec<String> = row
                .iter()
                .map(|b| match &b.url {
                    Some(url) => format!("{} <{}>", b.text, url),
                    None => b.text.clone(),
                })
                .collect();
            out.push_str(&format!("\n  [Buttons] {}", row_text.join(" | ")));
        }
        out
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode) as user {}", self.user_id);
        Ok(())
    }

    async fn send_message(&self, _chat_id: ChatId, reply: &Reply) -> Result<String, BotError> {
        println!("{}", Self::render(reply));
        Ok("console_msg".to_string())
    }

    async fn answer_inline(&self, query_id: &str, answers: &[InlineAnswer]) -> Result<(), BotError> {
        for answer in answers {
            println!("[INLINE {}] {}: {}", query_id, answer.title, answer.reply.text);
        }
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
