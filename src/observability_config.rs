//! # Observability Configuration
//!
//! Environment-specific settings for logging, metrics and trace export.

use std::env;

pub const SERVICE_NAME: &str = "fridge-lens-bot";

/// Observability configuration for different environments
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    /// OTLP endpoint for trace export
    pub otlp_endpoint: Option<String>,
    /// Log level for observability components
    pub log_level: String,
    /// Whether to enable trace sampling
    pub enable_trace_sampling: bool,
    /// Trace sampling ratio (0.0-1.0)
    pub trace_sampling_ratio: f64,
    /// Whether to serve Prometheus metrics
    pub enable_metrics_export: bool,
    /// Additional resource attributes for exported traces
    pub tags: Vec<(String, String)>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            otlp_endpoint: None,
            log_level: "info".to_string(),
            enable_trace_sampling: false,
            trace_sampling_ratio: 1.0,
            enable_metrics_export: true,
            tags: Vec::new(),
        }
    }
}

impl ObservabilityConfig {
    /// Load configuration from environment variables, starting from the
    /// preset for `ENVIRONMENT`
    pub fn from_env() -> Self {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let base = presets::for_environment(&environment);

        let mut config = Self {
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|e| !e.trim().is_empty()),
            log_level: env::var("OBSERVABILITY_LOG_LEVEL").unwrap_or(base.log_level),
            enable_trace_sampling: env::var("ENABLE_TRACE_SAMPLING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.enable_trace_sampling),
            trace_sampling_ratio: env::var("TRACE_SAMPLING_RATIO")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.trace_sampling_ratio),
            enable_metrics_export: env::var("ENABLE_METRICS_EXPORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.enable_metrics_export),
            tags: env::var("OBSERVABILITY_TAGS")
                .map(|tags| parse_tags(&tags))
                .unwrap_or_default(),
            environment,
        };
        config.add_default_tags();
        config
    }

    fn add_default_tags(&mut self) {
        self.tags
            .push(("deployment.environment".to_string(), self.environment.clone()));

        if let Ok(hostname) = env::var("HOSTNAME") {
            self.tags.push(("host.name".to_string(), hostname));
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(endpoint) = &self.otlp_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!("Invalid OTLP endpoint format: {}", endpoint));
            }
        }

        if !(0.0..=1.0).contains(&self.trace_sampling_ratio) {
            return Err(format!("Invalid trace sampling ratio: {}", self.trace_sampling_ratio));
        }

        Ok(())
    }
}

/// Parse tags from environment variable string
/// Format: "key1=value1,key2=value2,key3=value3"
fn parse_tags(tags_str: &str) -> Vec<(String, String)> {
    tags_str
        .split(',')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if !key.trim().is_empty() => {
                    Some((key.trim().to_string(), value.trim().to_string()))
                }
                _ => None,
            }
        })
        .collect()
}

/// Environment-specific configuration presets
pub mod presets {
    use super::ObservabilityConfig;

    pub fn for_environment(environment: &str) -> ObservabilityConfig {
        match environment {
            "production" => production(),
            "staging" => staging(),
            _ => development(),
        }
    }

    /// Development configuration with full observability
    pub fn development() -> ObservabilityConfig {
        ObservabilityConfig {
            environment: "development".to_string(),
            enable_trace_sampling: false,
            trace_sampling_ratio: 1.0,
            log_level: "debug".to_string(),
            ..Default::default()
        }
    }

    pub fn staging() -> ObservabilityConfig {
        ObservabilityConfig {
            environment: "staging".to_string(),
            enable_trace_sampling: true,
            trace_sampling_ratio: 0.5,
            log_level: "info".to_string(),
            ..Default::default()
        }
    }

    pub fn production() -> ObservabilityConfig {
        ObservabilityConfig {
            environment: "production".to_string(),
            enable_trace_sampling: true,
            trace_sampling_ratio: 0.1,
            log_level: "warn".to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_level, "info");
        assert!(!config.enable_trace_sampling);
        assert_eq!(config.trace_sampling_ratio, 1.0);
        assert!(config.enable_metrics_export);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ObservabilityConfig::default();
        assert!(config.validate().is_ok());

        config.otlp_endpoint = Some("invalid-endpoint".to_string());
        assert!(config.validate().is_err());

        config.otlp_endpoint = Some("http://localhost:4317".to_string());
        config.trace_sampling_ratio = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tag_parsing() {
        let tags = parse_tags("env=prod, version=1.2.3,broken,=x");

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], ("env".to_string(), "prod".to_string()));
        assert_eq!(tags[1], ("version".to_string(), "1.2.3".to_string()));
    }

    #[test]
    fn test_presets() {
        let prod = presets::for_environment("production");
        assert!(prod.is_production());
        assert!(prod.enable_trace_sampling);
        assert_eq!(prod.trace_sampling_ratio, 0.1);

        let unknown = presets::for_environment("laptop");
        assert!(unknown.is_development());
        assert_eq!(unknown.log_level, "debug");
    }
}
