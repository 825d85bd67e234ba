use super::User;
use chrono::{DateTime, Utc};

/// Numeric chat identity as assigned by the chat platform
pub type ChatId = i64;

/// Kind of conversation a message arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Parse the platform's chat type string; unknown kinds are treated as groups
    pub fn parse(kind: &str) -> Self {
        match kind {
            "private" => ChatKind::Private,
            "supergroup" => ChatKind::Supergroup,
            "channel" => ChatKind::Channel,
            _ => ChatKind::Group,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub kind: ChatKind,
}

impl Chat {
    pub fn private(id: ChatId) -> Self {
        Self { id, kind: ChatKind::Private }
    }

    pub fn group(id: ChatId) -> Self {
        Self { id, kind: ChatKind::Group }
    }

    pub fn is_private(&self) -> bool {
        self.kind == ChatKind::Private
    }
}

/// An incoming text message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat: Chat,
    pub sender: Option<User>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
}

impl Message {
    pub fn new(chat: Chat, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat,
            sender: None,
            text: text.into(),
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_sender(mut self, user: User) -> Self {
        self.sender = Some(user);
        self
    }

    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        self.sender = user;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }
}

/// An inline query typed into the platform's inline bot field
#[derive(Debug, Clone)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    pub query: String,
}

/// Everything the dispatcher can be asked to handle
#[derive(Debug, Clone)]
pub enum Update {
    Message(Message),
    InlineQuery(InlineQuery),
}
