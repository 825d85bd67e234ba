//! Application services - core commands, help and update processing

pub mod core_commands;
pub mod help;
pub mod message_service;

pub use core_commands::{plugin_list, CorePlugin, CoreSettings, CORE_PLUGIN_NAME};
pub use help::{command_info, gen_help};
pub use message_service::MessageService;
