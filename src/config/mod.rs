//! Configuration management
//!
//! This module handles loading and parsing configuration for the Izma backend
//! and the documentation translator.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Translator configuration
    #[serde(default)]
    pub translation: TranslationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin, `*` allows any origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/izma.db".to_string()
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Bearer token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime in minutes
    #[serde(default = "default_token_expire_minutes")]
    pub token_expire_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_expire_minutes: default_token_expire_minutes(),
        }
    }
}

fn default_jwt_secret() -> String {
    "your-secret-key".to_string()
}

fn default_token_expire_minutes() -> i64 {
    30
}

/// Translator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Gemini API key (usually supplied on the command line or via GEMINI_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the generative-language API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model override; each selection has its own default when unset
    #[serde(default)]
    pub model: Option<String>,
    /// Root of the English documentation tree
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    /// Root of the mirrored Urdu documentation tree
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: None,
            source_dir: default_source_dir(),
            target_dir: default_target_dir(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl TranslationConfig {
    /// API key to use: an explicit (command line) key wins over the one from
    /// the environment or config file. Blank keys count as missing.
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .or(self.api_key.as_deref())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("textbook/docs")
}

fn default_target_dir() -> PathBuf {
    PathBuf::from("textbook/i18n/ur/docusaurus-plugin-content-docs/current")
}

fn default_request_timeout() -> u64 {
    300
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - IZMA_SERVER_HOST / IZMA_SERVER_PORT / IZMA_SERVER_CORS_ORIGIN
    /// - IZMA_DATABASE_DRIVER / IZMA_DATABASE_URL
    /// - IZMA_AUTH_JWT_SECRET / IZMA_AUTH_TOKEN_EXPIRE_MINUTES
    /// - IZMA_TRANSLATION_BASE_URL / IZMA_TRANSLATION_SOURCE_DIR / IZMA_TRANSLATION_TARGET_DIR
    /// - GEMINI_API_KEY
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("IZMA_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("IZMA_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("IZMA_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(driver) = std::env::var("IZMA_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {}
            }
        }
        if let Ok(url) = std::env::var("IZMA_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(secret) = std::env::var("IZMA_AUTH_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(minutes) = std::env::var("IZMA_AUTH_TOKEN_EXPIRE_MINUTES") {
            if let Ok(minutes) = minutes.parse::<i64>() {
                self.auth.token_expire_minutes = minutes;
            }
        }

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                self.translation.api_key = Some(key);
            }
        }
        if let Ok(base_url) = std::env::var("IZMA_TRANSLATION_BASE_URL") {
            self.translation.base_url = base_url;
        }
        if let Ok(dir) = std::env::var("IZMA_TRANSLATION_SOURCE_DIR") {
            self.translation.source_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("IZMA_TRANSLATION_TARGET_DIR") {
            self.translation.target_dir = PathBuf::from(dir);
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared by every test that touches process environment variables.
#[cfg(test)]
pub(crate) static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
