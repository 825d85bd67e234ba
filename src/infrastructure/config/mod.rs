//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::domain::entities::UserId;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub admin: AdminConfig,
    pub plugins: PluginConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    /// Platform name shown in the /start greeting
    pub platform: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdminConfig {
    pub id: UserId,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Sender id given to console lines; match `admin.id` to run admin commands
    #[serde(default)]
    pub user_id: UserId,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "plugbot".to_string(),
                platform: "telegram".to_string(),
            },
            admin: AdminConfig { id: 0 },
            plugins: PluginConfig {
                directory: PathBuf::from("./plugins"),
            },
            adapters: AdaptersConfig {
                telegram: Some(TelegramConfig {
                    enabled: false,
                    token: None,
                }),
                console: Some(ConsoleConfig {
                    enabled: true,
                    user_id: 0,
                }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Override settings from BOT_TOKEN, BOT_ADMIN_ID and BOT_PLUGIN_DIR
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            self.set_token(token);
        }

        if let Ok(raw) = std::env::var("BOT_ADMIN_ID") {
            match parse_admin_id(&raw) {
                Ok(id) => self.admin.id = id,
                Err(e) => tracing::warn!("Ignoring BOT_ADMIN_ID: {}", e),
            }
        }

        if let Ok(dir) = std::env::var("BOT_PLUGIN_DIR") {
            self.plugins.directory = PathBuf::from(dir);
        }
    }

    /// Set the Telegram token and enable the adapter
    pub fn set_token(&mut self, token: impl Into<String>) {
        let tg = self.adapters.telegram.get_or_insert(TelegramConfig {
            enabled: true,
            token: None,
        });
        tg.token = Some(token.into());
        tg.enabled = true;
    }

    /// Token of an enabled Telegram adapter
    pub fn telegram_token(&self) -> Option<&str> {
        self.adapters
            .telegram
            .as_ref()
            .filter(|tg| tg.enabled)
            .and_then(|tg| tg.token.as_deref())
            .filter(|t| !t.is_empty())
    }

    pub fn console_user_id(&self) -> UserId {
        self.adapters.console.as_ref().map_or(0, |c| c.user_id)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(format!("Failed to render config: {}", e)))
    }
}

/// Numeric admin id, surrounding whitespace allowed
pub fn parse_admin_id(raw: &str) -> Result<UserId, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("admin id must be a number, got {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_id() {
        assert_eq!(parse_admin_id(" 42\n").unwrap(), 42);
        assert!(matches!(parse_admin_id("@admin"), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("user-id: 0"));

        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.bot.name, "plugbot");
        assert_eq!(parsed.plugins.directory, PathBuf::from("./plugins"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "bot: { name: cariboo, platform: console }\nadmin: { id: 42 }\nplugins: { directory: /srv/plugins }\nadapters:\n  telegram: { enabled: true, token: abc }\n  console: { enabled: false }\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.admin.id, 42);
        assert_eq!(config.telegram_token(), Some("abc"));
        assert_eq!(config.console_user_id(), 0);

        assert!(matches!(Config::load(dir.path().join("missing.yaml")), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_token_requires_enabled_adapter() {
        let mut config = Config::default();
        assert_eq!(config.telegram_token(), None);

        config.set_token("123:abc");
        assert_eq!(config.telegram_token(), Some("123:abc"));

        config.adapters.telegram = None;
        config.set_token("456:def");
        assert_eq!(config.telegram_token(), Some("456:def"));
    }
}
