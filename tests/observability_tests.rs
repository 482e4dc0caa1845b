//! # Observability Tests Module
//!
//! Metrics, spans and readiness checks as the bot uses them, exercised
//! without a running exporter.

#[cfg(test)]
mod tests {
    use fridge_lens::config::GeminiConfig;
    use fridge_lens::observability::{self, ReadinessChecks};
    use fridge_lens::observability_config::{presets, ObservabilityConfig};
    use std::time::Duration;

    fn readiness(api_key: &str, bot_token: &str) -> ReadinessChecks {
        ReadinessChecks {
            gemini: GeminiConfig {
                api_key: api_key.to_string(),
                ..GeminiConfig::default()
            },
            fonts: None,
            bot_token: bot_token.to_string(),
        }
    }

    /// Recording helpers are safe to call before a recorder is installed
    #[test]
    fn test_metrics_recording() {
        observability::record_telegram_message("photo");
        observability::record_gateway_metrics("extract_ingredients", true, Duration::from_millis(800));
        observability::record_gateway_metrics("generate_recipes", false, Duration::from_secs(3));
        observability::record_session_transition("camera", "analyzing");
        observability::record_share_metrics("shared", true);
        observability::record_capture_metrics("file_picker", 204_800);
        observability::record_error_metrics("analysis", "session");
    }

    #[test]
    fn test_span_creation() {
        let gateway = observability::gateway_span("generate_recipes", "gemini-2.5-flash");
        let session = observability::session_span("select_recipe", 42);
        let telegram = observability::telegram_span("message", None);

        let _entered = gateway.enter();
        session.in_scope(|| tracing::debug!("inside session span"));
        telegram.in_scope(|| tracing::debug!("inside telegram span"));
    }

    #[tokio::test]
    async fn test_concurrent_recording() {
        let handles: Vec<_> = (0..8)
            .map(|n| {
                tokio::spawn(async move {
                    let origin = if n % 2 == 0 { "camera" } else { "file_picker" };
                    observability::record_capture_metrics(origin, 1024 * n);
                    observability::record_session_transition("analyzing", "ingredients");
                })
            })
            .collect();

        for handle in handles {
            handle.await.expect("recording task panicked");
        }
    }

    #[test]
    fn test_readiness_reports_first_failure() {
        let error = observability::perform_readiness_checks(&readiness("key", ""))
            .expect_err("empty token fails");
        assert!(error.to_string().contains("token"));

        let error = observability::perform_readiness_checks(&readiness("", "123:abc"))
            .expect_err("missing api key fails");
        assert!(error.to_string().contains("Gateway"));

        let error = observability::perform_readiness_checks(&readiness("key", "123:abc"))
            .expect_err("fonts are not loaded");
        assert!(error.to_string().contains("fonts"));
    }

    #[test]
    fn test_environment_presets() {
        let development = presets::development();
        assert!(development.is_development());
        assert!(development.validate().is_ok());

        let production = presets::production();
        assert!(production.is_production());
        assert!(production.validate().is_ok());

        let staging = presets::for_environment("staging");
        assert!(!staging.is_production());
        assert!(!staging.is_development());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ObservabilityConfig::default();
        assert!(config.validate().is_ok());
    }
}
