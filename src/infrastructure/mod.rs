//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Plugins: Manifest loading, handler catalog and the registry
//! - Adapters: Platform integrations (Telegram, console)

pub mod config;
pub mod plugins;
pub mod adapters;
