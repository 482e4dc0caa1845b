//! # Application Error Types
//!
//! This module defines the error types used throughout FridgeLens.
//!
//! - [`FridgeError`] is the user-facing taxonomy of the capture → analysis →
//!   recipes → share flow. Every variant carries an already-localized message
//!   that the session shows as a toast.
//! - [`AppError`] covers startup and infrastructure failures (configuration,
//!   network setup, internal errors).

use std::fmt;

/// Failures of the fridge flow, recovered at the session boundary
#[derive(Debug, Clone, PartialEq)]
pub enum FridgeError {
    /// Camera or permission failure; the message points the user to file upload
    CameraAccess(String),
    /// Ingredient extraction failed or returned unusable data
    Analysis(String),
    /// Recipe generation failed or returned unusable data
    RecipeGeneration(String),
    /// Card rendering or the platform share/download failed
    ShareExport(String),
}

impl FridgeError {
    /// The localized message to show to the user
    pub fn user_message(&self) -> &str {
        match self {
            FridgeError::CameraAccess(msg)
            | FridgeError::Analysis(msg)
            | FridgeError::RecipeGeneration(msg)
            | FridgeError::ShareExport(msg) => msg,
        }
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FridgeError::CameraAccess(_) => "camera_access",
            FridgeError::Analysis(_) => "analysis",
            FridgeError::RecipeGeneration(_) => "recipe_generation",
            FridgeError::ShareExport(_) => "share_export",
        }
    }
}

impl fmt::Display for FridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FridgeError::CameraAccess(msg) => write!(f, "[CAMERA] {}", msg),
            FridgeError::Analysis(msg) => write!(f, "[ANALYSIS] {}", msg),
            FridgeError::RecipeGeneration(msg) => write!(f, "[RECIPES] {}", msg),
            FridgeError::ShareExport(msg) => write!(f, "[SHARE] {}", msg),
        }
    }
}

impl std::error::Error for FridgeError {}

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// File system errors
    FileSystem(String),
    /// Network/communication errors
    Network(String),
    /// Errors surfaced by the fridge flow
    Flow(FridgeError),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::FileSystem(msg) => write!(f, "[FILESYSTEM] {}", msg),
            AppError::Network(msg) => write!(f, "[NETWORK] {}", msg),
            AppError::Flow(err) => write!(f, "{}", err),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileSystem(err.to_string())
    }
}

impl From<FridgeError> for AppError {
    fn from(err: FridgeError) -> Self {
        AppError::Flow(err)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    /// Log a failed call to the hosted model
    pub fn log_gateway_error(
        error: &impl std::fmt::Display,
        operation: &str,
        model: &str,
        processing_duration: Option<std::time::Duration>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            model = %model,
            processing_duration_ms = ?processing_duration.map(|d| d.as_millis()),
            "Gateway call failed"
        );
    }

    /// Log image acquisition or decoding errors
    pub fn log_capture_error(
        error: &impl std::fmt::Display,
        operation: &str,
        chat_id: Option<i64>,
        image_size: Option<u64>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            chat_id = ?chat_id,
            image_size_bytes = ?image_size,
            "Image capture failed"
        );
    }

    /// Log card rendering and delivery errors
    pub fn log_share_error(
        error: &impl std::fmt::Display,
        operation: &str,
        chat_id: Option<i64>,
        recipe_id: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            chat_id = ?chat_id,
            recipe_id = ?recipe_id,
            "Recipe card export failed"
        );
    }

    /// Log network/communication errors with connection context
    pub fn log_network_error(
        error: &impl std::fmt::Display,
        operation: &str,
        endpoint: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            endpoint = ?endpoint,
            "Network operation failed"
        );
    }

    /// Log validation errors with input context
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        chat_id: Option<i64>,
        input_type: &str,
        input_value: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            chat_id = ?chat_id,
            input_type = %input_type,
            input_value = ?input_value.map(|v| if v.chars().count() > 100 {
                format!("{}...", v.chars().take(100).collect::<String>())
            } else {
                v.to_string()
            }),
            "Validation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}
