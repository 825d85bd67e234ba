//! Domain entities - Core business objects

pub mod user;
pub mod message;
pub mod command;
pub mod plugin;

pub use user::{User, UserId};
pub use message::{Chat, ChatId, ChatKind, InlineQuery, Message, Update};
pub use command::{handler, CommandBinding, Handler, HandlerResult, MessageBinding, ParseMode, Reply};
pub use plugin::{PluginDescriptor, PluginState};
