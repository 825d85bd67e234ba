/// Numeric user identity as assigned by the chat platform
pub type UserId = i64;

/// Sender of a message or inline query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: UserId,
    pub username: Option<String>,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self { id, username: None }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}
