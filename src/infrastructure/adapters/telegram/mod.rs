//! Telegram adapter

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{self, ChatId, ChatKind, Reply};
use crate::domain::traits::{Bot, BotInfo, InlineAnswer, KeyboardButton};
use crate::application::errors::BotError;

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub inline_query: Option<InlineQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub date: Option<i64>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    pub query: String,
}

impl From<User> for entities::User {
    fn from(user: User) -> Self {
        entities::User {
            id: user.id,
            username: user.username,
        }
    }
}

impl Update {
    /// Convert to a domain update. Non-text messages and other update kinds yield nothing.
    pub fn into_domain(self) -> Option<entities::Update> {
        if let Some(query) = self.inline_query {
            return Some(entities::Update::InlineQuery(entities::InlineQuery {
                id: query.id,
                from: query.from.into(),
                query: query.query,
            }));
        }

        let message = self.message?;
        let text = message.text?;
        let chat = entities::Chat {
            id: message.chat.id,
            kind: ChatKind::parse(&message.chat.kind),
        };
        let mut domain = entities::Message::new(chat, text)
            .with_id(message.message_id.to_string())
            .with_sender_opt(message.from.map(Into::into))
            .with_platform("telegram");
        if let Some(date) = message.date.and_then(|d| Utc.timestamp_opt(d, 0).single()) {
            domain = domain.with_timestamp(date);
        }
        Some(entities::Update::Message(domain))
    }
}

#[derive(Serialize)]
struct InlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Serialize)]
struct ReplyMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

fn reply_markup(keyboard: &[Vec<KeyboardButton>]) -> Option<ReplyMarkup> {
    if keyboard.is_empty() {
        return None;
    }
    let inline_keyboard = keyboard
        .iter()
        .map(|row| {
            row.iter()
                .map(|btn| InlineKeyboardButton {
                    text: btn.text.clone(),
                    url: btn.url.clone(),
                })
                .collect()
        })
        .collect();
    Some(ReplyMarkup { inline_keyboard })
}

/// First eight characters of the token, for logs
fn token_preview(token: &str) -> String {
    token.chars().take(8).collect()
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "plugbot".to_string(),
                username: "plugbot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// POST a JSON body and decode the `result` field
    async fn call<T, R>(&self, method: &str, body: &T) -> Result<R, BotError>
    where
        T: Serialize + ?Sized + Sync,
        R: for<'de> Deserialize<'de>,
    {
        #[derive(Deserialize)]
        struct Response<V> {
            result: V,
        }

        let response = self.client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!("Telegram API error {}: {}", status, error)));
        }

        let data: Response<R> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;
        Ok(data.result)
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let me: BotInfoResponse = self.call("getMe", &serde_json::json!({})).await?;
        self.info = BotInfo {
            id: me.id.to_string(),
            name: me.first_name,
            username: me.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string(), "inline_query".to_string()],
        };
        self.call("getUpdates", &request).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(0)
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", token_preview(&self.token));
        Ok(())
    }

    async fn send_message(&self, chat_id: ChatId, reply: &Reply) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: ChatId,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<ReplyMarkup>,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        tracing::debug!("Sending to {}: {}", chat_id, reply.text);
        let request = SendMessageRequest {
            chat_id,
            text: &reply.text,
            parse_mode: reply.parse_mode.as_ref().map(|m| m.as_str()),
            reply_markup: reply_markup(&reply.keyboard),
        };

        match self.call::<_, MessageResult>("sendMessage", &request).await {
            Ok(result) => Ok(result.message_id.to_string()),
            Err(e) => {
                tracing::error!("Failed to send message: {}", e);
                Err(e)
            }
        }
    }

    async fn answer_inline(&self, query_id: &str, answers: &[InlineAnswer]) -> Result<(), BotError> {
        let results: Vec<serde_json::Value> = answers
            .iter()
            .map(|answer| {
                let mut content = serde_json::json!({ "message_text": answer.reply.text });
                if let Some(mode) = &answer.reply.parse_mode {
                    content["parse_mode"] = serde_json::Value::from(mode.as_str());
                }
                serde_json::json!({
                    "type": "article",
                    "id": answer.id,
                    "title": answer.title,
                    "description": answer.reply.text,
                    "input_message_content": content,
                })
            })
            .collect();

        let request = serde_json::json!({
            "inline_query_id": query_id,
            "results": results,
        });
        let _: bool = self.call("answerInlineQuery", &request).await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
