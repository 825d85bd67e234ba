//! plugbot - a chat bot whose commands and message handlers come from
//! plugins that can be reloaded while the bot runs.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;
