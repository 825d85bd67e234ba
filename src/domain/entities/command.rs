use std::fmt;
use std::sync::Arc;

use regex_lite::Regex;

use crate::application::errors::CommandError;
use crate::application::messaging::Context;
use crate::domain::traits::KeyboardButton;

/// Result of running a handler; `None` means nothing to reply
pub type HandlerResult = Result<Option<Reply>, CommandError>;

/// Shared handler function type
pub type Handler = Arc<dyn Fn(&mut Context<'_>) -> HandlerResult + Send + Sync>;

/// Wrap a closure into a [`Handler`]
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Formatting applied by the platform when rendering a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
}

impl ParseMode {
    pub fn as_str(&self) -> &str {
        match self {
            ParseMode::Html => "HTML",
        }
    }
}

/// Outgoing reply produced by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub keyboard: Vec<Vec<KeyboardButton>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
            keyboard: Vec::new(),
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self::text(text).with_parse_mode(ParseMode::Html)
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    pub fn with_keyboard(mut self, keyboard: Vec<Vec<KeyboardButton>>) -> Self {
        self.keyboard = keyboard;
        self
    }
}

/// A literal command token mapped to a handler
#[derive(Clone)]
pub struct CommandBinding {
    pub command: String,
    pub handler: Handler,
    pub description: Option<String>,
    pub docs: Option<String>,
    pub hidden: bool,
}

impl CommandBinding {
    pub fn new<F>(command: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        Self::from_handler(command, handler(f))
    }

    pub fn from_handler(command: impl Into<String>, handler: Handler) -> Self {
        Self {
            command: command.into(),
            handler,
            description: None,
            docs: None,
            hidden: false,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Whether a chat message addresses this command.
    ///
    /// Accepts the bare token, the token followed by arguments, the token
    /// with a `@botname` suffix, and any text starting with the token that
    /// carries a slash-delimited sub-argument (`/cmd/sub`).
    pub fn matches(&self, text: &str) -> bool {
        let command = self.command.as_str();
        let Some(rest) = text.strip_prefix(command) else {
            return false;
        };

        rest.is_empty()
            || rest.starts_with(' ')
            || rest.starts_with('@')
            || text.split('/').count() > 2
    }

    /// Whether an inline query starts with this command's token
    pub fn matches_inline(&self, query: &str) -> bool {
        query.starts_with(self.command.as_str())
    }
}

impl fmt::Debug for CommandBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBinding")
            .field("command", &self.command)
            .field("description", &self.description)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

/// A regular expression mapped to a passive handler
#[derive(Clone)]
pub struct MessageBinding {
    pub regex: Regex,
    pub handler: Handler,
}

impl MessageBinding {
    pub fn new<F>(regex: Regex, f: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        Self::from_handler(regex, handler(f))
    }

    pub fn from_handler(regex: Regex, handler: Handler) -> Self {
        Self { regex, handler }
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Match anchored at the start of the text.
    ///
    /// Leftmost-first search returns a match at offset 0 whenever one exists.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.find(text).is_some_and(|m| m.start() == 0)
    }
}

impl fmt::Debug for MessageBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBinding")
            .field("regex", &self.regex.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> HandlerResult {
        Ok(None)
    }

    fn binding(command: &str) -> CommandBinding {
        CommandBinding::new(command, |_| noop())
    }

    #[test]
    fn test_command_matches_bare_args_and_mention() {
        let cmd = binding("/cash");
        assert!(cmd.matches("/cash"));
        assert!(cmd.matches("/cash 100 usd"));
        assert!(cmd.matches("/cash@plug_bot"));
        assert!(cmd.matches("/cash@plug_bot 10"));
    }

    #[test]
    fn test_command_matches_slash_subargument() {
        let cmd = binding("/cash");
        assert!(cmd.matches("/cash/usd"));
        assert!(cmd.matches("/cashflow/weekly"));
    }

    #[test]
    fn test_command_rejects_other_text() {
        let cmd = binding("/cash");
        assert!(!cmd.matches("/cashflow"));
        assert!(!cmd.matches("cash"));
        assert!(!cmd.matches(" /cash"));
        assert!(!cmd.matches("/cas"));
    }

    #[test]
    fn test_inline_prefix() {
        let cmd = binding("/cash");
        assert!(cmd.matches_inline("/cash"));
        assert!(cmd.matches_inline("/cashflow"));
        assert!(!cmd.matches_inline("cash"));
    }

    #[test]
    fn test_message_binding_is_anchored() {
        let re = Regex::new("(?i)hello").unwrap();
        let binding = MessageBinding::new(re, |_| noop());
        assert!(binding.matches("Hello there"));
        assert!(!binding.matches("well, hello"));
        assert_eq!(binding.pattern(), "(?i)hello");
    }
}
