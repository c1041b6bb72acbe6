use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub discord: DiscordConfig,
    pub wiki: WikiConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct DiscordConfig {
    /// Base URL for follow-up webhook calls (`{base}/webhooks/{app_id}/{token}`).
    pub api_base: String,
    pub followup_timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct WikiConfig {
    pub summary_base: String,
    pub search_base: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub hostname: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub discord_api_base: Option<String>,
    pub wiki_summary_base: Option<String>,
    pub wiki_search_base: Option<String>,
    pub hostname: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig { bind_address: "0.0.0.0".to_string(), port: 3000 },
            discord: DiscordConfig {
                api_base: "https://discord.com/api/v10".to_string(),
                followup_timeout_secs: 10,
            },
            wiki: WikiConfig {
                summary_base: "https://en.wikipedia.org/api/rest_v1".to_string(),
                search_base: "https://api.wikimedia.org/core/v1/wikipedia/en".to_string(),
                timeout_secs: 10,
            },
            display: DisplayConfig { hostname: "unknown".to_string() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Everything is environment-derived; the process deliberately owns no
    /// config files (state lives in the identifiers it hands out).
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("GRIDBOT_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("GRIDBOT_PORT") {
            self.server.port = parse_u16("GRIDBOT_PORT", &value)?;
        }

        if let Some(value) = read_env("GRIDBOT_DISCORD_API_BASE") {
            self.discord.api_base = value;
        }
        if let Some(value) = read_env("GRIDBOT_FOLLOWUP_TIMEOUT_SECS") {
            self.discord.followup_timeout_secs =
                parse_u64("GRIDBOT_FOLLOWUP_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("GRIDBOT_WIKI_API_BASE") {
            self.wiki.summary_base = value;
        }
        if let Some(value) = read_env("GRIDBOT_WIKI_SEARCH_BASE") {
            self.wiki.search_base = value;
        }
        if let Some(value) = read_env("GRIDBOT_WIKI_TIMEOUT_SECS") {
            self.wiki.timeout_secs = parse_u64("GRIDBOT_WIKI_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("HOSTNAME") {
            self.display.hostname = value;
        }

        if let Some(value) = read_env("GRIDBOT_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("GRIDBOT_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(discord_api_base) = overrides.discord_api_base {
            self.discord.api_base = discord_api_base;
        }
        if let Some(wiki_summary_base) = overrides.wiki_summary_base {
            self.wiki.summary_base = wiki_summary_base;
        }
        if let Some(wiki_search_base) = overrides.wiki_search_base {
            self.wiki.search_base = wiki_search_base;
        }
        if let Some(hostname) = overrides.hostname {
            self.display.hostname = hostname;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must be greater than zero".to_string(),
            ));
        }
        if self.discord.followup_timeout_secs == 0 || self.discord.followup_timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "discord.followup_timeout_secs must be in range 1..=300".to_string(),
            ));
        }
        if self.wiki.timeout_secs == 0 || self.wiki.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "wiki.timeout_secs must be in range 1..=300".to_string(),
            ));
        }
        for (key, value) in [
            ("discord.api_base", &self.discord.api_base),
            ("wiki.summary_base", &self.wiki.summary_base),
            ("wiki.search_base", &self.wiki.search_base),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::Validation(format!("{key} must be an http(s) URL")));
            }
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::Validation(
                "logging.level must be one of trace|debug|info|warn|error".to_string(),
            )),
        }
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() })
}
