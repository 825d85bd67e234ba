//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Errors: bot, command, plugin and config failures
//! - Messaging: context, routers and the dispatcher
//! - Services: core commands, help text, update processing

pub mod errors;
pub mod messaging;
pub mod services;
