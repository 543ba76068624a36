use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variables that take precedence over the config file.
pub mod env_keys {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const STREAM_API_KEY: &str = "STREAM_API_KEY";
    pub const STREAM_API_SECRET: &str = "STREAM_API_SECRET";
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub openai: OpenAiConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub api_key: String,
    pub api_secret: String,
    /// REST base URL of the video API.
    pub base_url: String,
    /// Websocket endpoint that bridges a call to an OpenAI realtime model.
    pub realtime_url: String,
    /// Call type used when addressing calls by meeting id.
    pub call_type: String,
    /// Lifetime of tokens minted for agent users.
    pub token_ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub realtime_model: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Defaults to `<data_dir>/meetai/meetai.db`.
    pub path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            base_url: "https://video.stream-io-api.com".to_string(),
            realtime_url: "wss://video.stream-io-api.com/video/connect_agent".to_string(),
            call_type: "default".to_string(),
            token_ttl_seconds: 3600,
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            realtime_model: "gpt-4o-realtime-preview".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads the config at `path`, writing defaults there first if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, creating default at {:?}", path);
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty(env_keys::OPENAI_API_KEY) {
            debug!("Using OpenAI API key from environment");
            self.openai.api_key = Some(key);
        }
        if let Some(key) = non_empty(env_keys::STREAM_API_KEY) {
            debug!("Using video API key from environment");
            self.stream.api_key = key;
        }
        if let Some(secret) = non_empty(env_keys::STREAM_API_SECRET) {
            debug!("Using video API secret from environment");
            self.stream.api_secret = secret;
        }
    }

    /// Returns the OpenAI key, which the webhook server cannot run without.
    pub fn require_openai_key(&self) -> Result<String> {
        self.openai
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| {
                format!(
                    "OpenAI API key is not configured (set {} or openai.api_key)",
                    env_keys::OPENAI_API_KEY
                )
            })
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(PathBuf::from(path)),
            None => global::db_file(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
