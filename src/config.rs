//! # Unified Application Configuration
//!
//! This module consolidates all application settings into a single,
//! structured configuration object. Settings are loaded from environment
//! variables (optionally seeded from `.env`), validated per section, and
//! summarized for startup logs with secrets redacted.

use crate::errors::{AppError, AppResult};
use crate::gateway::gemini::{API_BASE_URL, DEFAULT_MODEL};
use crate::localization::SUPPORTED_LANGUAGES;
use crate::observability_config::ObservabilityConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Read an optional environment variable, parsing it or falling back to `default`
fn env_parse<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number", key))),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|value| value.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Bot-specific configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// HTTP client timeout in seconds
    pub http_timeout_secs: u64,
    /// Language used when the Telegram user has none we support
    pub default_language: String,
    /// Send recipe cards as photos (share sheet) instead of documents (download)
    pub share_as_photo: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            http_timeout_secs: 30,
            default_language: "en".to_string(),
            share_as_photo: true,
        }
    }
}

impl BotConfig {
    /// Validate bot configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.token.trim().is_empty() {
            return Err(AppError::Config("Bot token cannot be empty".to_string()));
        }

        let parts: Vec<&str> = self.token.split(':').collect();
        if parts.len() != 2 {
            return Err(AppError::Config(
                "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
            ));
        }

        if parts[0].parse::<u64>().is_err() {
            return Err(AppError::Config(
                "Bot token bot ID must be numeric".to_string(),
            ));
        }

        if parts[1].len() < 20 {
            return Err(AppError::Config(
                "Bot token appears to be too short. Please verify it's a valid token".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 || self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout must be between 1 and 300 seconds".to_string(),
            ));
        }

        if !SUPPORTED_LANGUAGES.contains(&self.default_language.as_str()) {
            return Err(AppError::Config(format!(
                "Unsupported default language '{}'. Supported: {}",
                self.default_language,
                SUPPORTED_LANGUAGES.join(", ")
            )));
        }

        Ok(())
    }
}

/// Hosted model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl GeminiConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::Config("Gemini API key cannot be empty".to_string()));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Gemini model cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Invalid Gemini base URL: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(AppError::Config(
                "Gemini timeout must be between 1 and 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Photo intake limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub max_image_size_bytes: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_image_size_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.max_image_size_bytes < 1024 {
            return Err(AppError::Config(
                "Max image size must be at least 1KB".to_string(),
            ));
        }

        if self.max_image_size_bytes > 50 * 1024 * 1024 {
            return Err(AppError::Config(
                "Max image size cannot exceed 50MB".to_string(),
            ));
        }

        Ok(())
    }
}

/// Recipe card font locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardConfig {
    /// Regular weight; when unset, common system font locations are tried
    pub font_path: Option<String>,
    pub bold_font_path: Option<String>,
    pub italic_font_path: Option<String>,
}

impl CardConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.font_path.is_none()
            && (self.bold_font_path.is_some() || self.italic_font_path.is_some())
        {
            return Err(AppError::Config(
                "CARD_FONT_PATH is required when other card font paths are set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Server configuration for health checks and metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Metrics and health server port
    pub metrics_port: u16,
    /// Whether to allow privileged ports (< 1024)
    pub allow_privileged_ports: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            metrics_port: 9090,
            allow_privileged_ports: false,
        }
    }
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.metrics_port == 0 {
            return Err(AppError::Config("Metrics port cannot be 0".to_string()));
        }

        if !self.allow_privileged_ports && self.metrics_port < 1024 {
            return Err(AppError::Config(format!(
                "Metrics port {} is privileged. Set allow_privileged_ports=true or use port >= 1024",
                self.metrics_port
            )));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub bot: BotConfig,
    pub gemini: GeminiConfig,
    pub capture: CaptureConfig,
    pub card: CardConfig,
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        // Bot
        config.bot.token = env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
            AppError::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;
        config.bot.http_timeout_secs =
            env_parse("HTTP_CLIENT_TIMEOUT_SECS", config.bot.http_timeout_secs)?;
        if let Some(language) = env_optional("DEFAULT_LANGUAGE") {
            config.bot.default_language = language.trim().to_lowercase();
        }
        config.bot.share_as_photo = env_flag("SHARE_AS_PHOTO", config.bot.share_as_photo);

        // Gemini
        config.gemini.api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            AppError::Config("GEMINI_API_KEY environment variable is required".to_string())
        })?;
        if let Some(model) = env_optional("GEMINI_MODEL") {
            config.gemini.model = model;
        }
        if let Some(base_url) = env_optional("GEMINI_BASE_URL") {
            config.gemini.base_url = base_url.trim_end_matches('/').to_string();
        }
        config.gemini.timeout_secs = env_parse("GEMINI_TIMEOUT_SECS", config.gemini.timeout_secs)?;

        // Capture
        config.capture.max_image_size_bytes =
            env_parse("MAX_IMAGE_SIZE_BYTES", config.capture.max_image_size_bytes)?;

        // Card fonts
        config.card.font_path = env_optional("CARD_FONT_PATH");
        config.card.bold_font_path = env_optional("CARD_BOLD_FONT_PATH");
        config.card.italic_font_path = env_optional("CARD_ITALIC_FONT_PATH");

        // Server
        config.server.metrics_port = env::var("METRICS_PORT")
            .unwrap_or_else(|_| "9090".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("METRICS_PORT must be a valid port number".to_string())
            })?;
        config.server.allow_privileged_ports = env_flag("ALLOW_PRIVILEGED_PORTS", false);

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.bot.validate()?;
        self.gemini.validate()?;
        self.capture.validate()?;
        self.card.validate()?;
        self.server.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: bot_token=[REDACTED], gemini_api_key=[REDACTED], gemini_model={}, default_language={}, share_as_photo={}, max_image_size_bytes={}, metrics_port={}, environment={}",
            self.gemini.model,
            self.bot.default_language,
            self.bot.share_as_photo,
            self.capture.max_image_size_bytes,
            self.server.metrics_port,
            self.observability.environment
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.bot.token = "123456789:AAFakeTokenForTestingPurposes1234567890".to_string();
        config.gemini.api_key = "test-key".to_string();
        config
    }

    #[test]
    fn test_default_config_requires_secrets() {
        assert!(AppConfig::default().validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_bot_config_validation() {
        let mut config = BotConfig::default();

        // Invalid: empty token
        assert!(config.validate().is_err());

        // Invalid: malformed token
        config.token = "invalid-token".to_string();
        assert!(config.validate().is_err());

        // Invalid: short token
        config.token = "123:short".to_string();
        assert!(config.validate().is_err());

        config.token = "123456789:AAFakeTokenForTestingPurposes1234567890".to_string();
        assert!(config.validate().is_ok());

        config.http_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.http_timeout_secs = 30;

        config.default_language = "de".to_string();
        assert!(config.validate().is_err());
        config.default_language = "tr".to_string();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gemini_config_validation() {
        let mut config = GeminiConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");

        // Invalid: missing key
        assert!(config.validate().is_err());
        config.api_key = "key".to_string();
        assert!(config.validate().is_ok());

        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
        config.base_url = "http://127.0.0.1:8080/v1beta".to_string();
        assert!(config.validate().is_ok());

        config.timeout_secs = 301;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_capture_config_validation() {
        let mut config = CaptureConfig::default();
        assert!(config.validate().is_ok());

        config.max_image_size_bytes = 512;
        assert!(config.validate().is_err());

        config.max_image_size_bytes = 60 * 1024 * 1024;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_card_config_validation() {
        let mut config = CardConfig::default();
        assert!(config.validate().is_ok());

        config.bold_font_path = Some("/fonts/bold.ttf".to_string());
        assert!(config.validate().is_err());

        config.font_path = Some("/fonts/regular.ttf".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        // Invalid: privileged port without permission
        config.metrics_port = 80;
        assert!(config.validate().is_err());

        // Valid: privileged port with permission
        config.allow_privileged_ports = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_summary_redacts_secrets() {
        let config = valid_config();
        let summary = config.summary();
        assert!(!summary.contains("AAFakeToken"));
        assert!(!summary.contains("test-key"));
        assert!(summary.contains("gemini-2.5-flash"));
    }
}
