//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Command execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Admin-only command invoked by someone else. Replied as plain text.
    #[error("Access Denied.")]
    AccessDenied,

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Failures while turning a plugin source unit into a descriptor
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("Unsupported schema-version {0}")]
    UnsupportedVersion(u32),

    #[error("Unknown handler '{0}'")]
    UnknownHandler(String),

    #[error("Invalid regex '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("Invalid command token '{0}': must start with '/'")]
    InvalidCommand(String),

    #[error("Legacy manifests (schema-version 0) cannot declare message handlers")]
    LegacyHandlers,

    #[error("Plugin not found: {0}")]
    NotFound(String),
}

pub type PluginResult<T> = Result<T, PluginError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
