//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory where uploaded attachments are stored.
    pub upload_dir: PathBuf,
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; overrides the individual fields when set
    /// (e.g. `sqlite://atipicidades.db?mode=rwc`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Desktop client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend API.
    pub api_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// When set, the server also writes daily-rotated log files here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl AppConfig {
    /// Get config file path (platform config directory, falling back to the working directory).
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("br", "Atipicidades", "atipicidades")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation("Server host cannot be empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Server port must be greater than 0".to_string()));
        }
        if self.server.upload_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("Upload directory cannot be empty".to_string()));
        }
        if self.database.url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(ConfigError::Validation("Database URL cannot be blank".to_string()));
        }
        if self.database.url.is_none() {
            if self.database.host.trim().is_empty() {
                return Err(ConfigError::Validation("Database host cannot be empty".to_string()));
            }
            if self.database.port == 0 {
                return Err(ConfigError::Validation(
                    "Database port must be greater than 0".to_string(),
                ));
            }
            if self.database.name.trim().is_empty() {
                return Err(ConfigError::Validation("Database name cannot be empty".to_string()));
            }
        }
        if !self.client.api_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "API URL must start with http:// or https://".to_string(),
            ));
        }
        if self.client.timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "Client timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl DatabaseConfig {
    /// Build connection string for SeaORM.
    pub fn connection_string(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.name
        )
    }
}

impl ServerConfig {
    /// Socket address the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            name: "atipicidades".to_string(),
            username: "postgres".to_string(),
            password: String::new(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3001".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
