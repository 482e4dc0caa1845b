//! Observability module for centralized metrics, tracing, and logging setup.
//!
//! This module provides:
//! - Metrics collection and Prometheus export
//! - Distributed tracing with OpenTelemetry
//! - Structured logging with configurable levels
//! - Health check endpoints for monitoring

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{Sampler, SdkTracer, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use tokio::net::TcpListener;
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use crate::card::raster::CardFonts;
use crate::config::GeminiConfig;
use crate::observability_config::{ObservabilityConfig, SERVICE_NAME};

/// Dependencies checked by `/health/ready`
#[derive(Debug, Clone)]
pub struct ReadinessChecks {
    pub gemini: GeminiConfig,
    pub fonts: Option<Arc<CardFonts>>,
    pub bot_token: String,
}

/// Initialize the complete observability stack: logging, metrics, trace
/// export and the metrics/health server on `port`
pub async fn init_observability(
    config: &ObservabilityConfig,
    port: u16,
    readiness: ReadinessChecks,
) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    let tracer_provider = build_tracer_provider(config)?;
    init_tracing(config, tracer_provider.as_ref())?;

    match tracer_provider {
        Some(provider) => {
            global::set_tracer_provider(provider);
            tracing::info!(
                otlp_endpoint = ?config.otlp_endpoint,
                trace_sampling_enabled = %config.enable_trace_sampling,
                trace_sampling_ratio = %config.trace_sampling_ratio,
                "OpenTelemetry tracing initialized with OTLP export"
            );
        }
        None => tracing::info!("OpenTelemetry tracing disabled (no OTLP endpoint configured)"),
    }

    if config.enable_metrics_export {
        let metrics_handle = init_metrics()?;
        start_metrics_server(metrics_handle, port, Arc::new(readiness)).await?;
    } else {
        tracing::info!("Metrics export disabled");
    }

    tracing::info!(
        environment = %config.environment,
        otlp_endpoint = ?config.otlp_endpoint,
        metrics_port = %port,
        "Observability stack initialized successfully"
    );
    Ok(())
}

/// Bridge from `tracing` spans to the OTLP tracer, when one is configured
fn otel_layer<S>(provider: Option<&SdkTracerProvider>) -> Option<OpenTelemetryLayer<S, SdkTracer>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    provider.map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME)))
}

/// Initialize structured logging (pretty in development, JSON otherwise),
/// exporting spans through `tracer_provider` when given
fn init_tracing(
    config: &ObservabilityConfig,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("fridge_lens={}", config.log_level).parse()?)
        .add_directive("teloxide=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    let pretty = config.is_development()
        || std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()) == "pretty";

    if pretty {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .with(otel_layer(tracer_provider))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .with(otel_layer(tracer_provider))
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Metrics collection initialized");
    Ok(handle)
}

/// Build the OTLP tracer provider when an endpoint is configured
fn build_tracer_provider(config: &ObservabilityConfig) -> Result<Option<SdkTracerProvider>> {
    let Some(endpoint) = &config.otlp_endpoint else {
        return Ok(None);
    };

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint.clone())
        .build()?;

    let resource = Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_attributes(
            config
                .tags
                .iter()
                .map(|(key, value)| KeyValue::new(key.clone(), value.clone())),
        )
        .build();

    let sampler = if config.enable_trace_sampling {
        Sampler::TraceIdRatioBased(config.trace_sampling_ratio)
    } else {
        Sampler::AlwaysOn
    };

    Ok(Some(
        SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_sampler(sampler)
            .with_resource(resource)
            .build(),
    ))
}

async fn start_metrics_server(
    metrics_handle: PrometheusHandle,
    port: u16,
    readiness: Arc<ReadinessChecks>,
) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on {}", addr);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let metrics_handle = metrics_handle.clone();
                    let readiness = Arc::clone(&readiness);

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = hyper::service::service_fn(
                            move |req: hyper::Request<hyper::body::Incoming>| {
                                let metrics_handle = metrics_handle.clone();
                                let readiness = Arc::clone(&readiness);
                                async move {
                                    Ok::<_, std::convert::Infallible>(route(
                                        req.method(),
                                        req.uri().path(),
                                        &metrics_handle,
                                        &readiness,
                                    ))
                                }
                            },
                        );

                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await
                        {
                            tracing::error!("Error serving connection: {:?}", err);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Error accepting connection: {}", e);
                }
            }
        }
    });

    Ok(())
}

fn route(
    method: &hyper::Method,
    path: &str,
    metrics_handle: &PrometheusHandle,
    readiness: &ReadinessChecks,
) -> hyper::Response<String> {
    match (method, path) {
        (&hyper::Method::GET, "/metrics") => {
            let mut response = hyper::Response::new(metrics_handle.render());
            response.headers_mut().insert(
                "content-type",
                hyper::header::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
            );
            response
        }
        (&hyper::Method::GET, "/health/live") => hyper::Response::new("OK".to_string()),
        (&hyper::Method::GET, "/health/ready") => match perform_readiness_checks(readiness) {
            Ok(()) => hyper::Response::new("OK".to_string()),
            Err(e) => {
                let mut response = hyper::Response::new(format!("NOT READY: {}", e));
                *response.status_mut() = hyper::StatusCode::SERVICE_UNAVAILABLE;
                response
            }
        },
        _ => {
            let mut response = hyper::Response::new("Not Found".to_string());
            *response.status_mut() = hyper::StatusCode::NOT_FOUND;
            response
        }
    }
}

/// Check every dependency the bot needs to serve a chat
pub fn perform_readiness_checks(checks: &ReadinessChecks) -> Result<()> {
    check_bot_token_health(&checks.bot_token)?;
    check_gateway_health(&checks.gemini)?;
    check_fonts_health(checks.fonts.as_deref())?;
    Ok(())
}

/// The model gateway is usable when its configuration validates
pub fn check_gateway_health(config: &GeminiConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Gateway health check failed: {}", e))?;
    tracing::debug!("Gateway health check passed");
    Ok(())
}

/// Recipe cards can only be exported once fonts are loaded
pub fn check_fonts_health(fonts: Option<&CardFonts>) -> Result<()> {
    match fonts {
        Some(_) => Ok(()),
        None => Err(anyhow::anyhow!("Card fonts are not loaded")),
    }
}

/// Check the Telegram bot token format
pub fn check_bot_token_health(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(anyhow::anyhow!("Bot token is empty"));
    }

    if !token.contains(':') {
        return Err(anyhow::anyhow!("Bot token format is invalid"));
    }

    Ok(())
}

/// Create a span for model gateway calls
pub fn gateway_span(operation: &str, model: &str) -> tracing::Span {
    tracing::info_span!(
        "gateway_operation",
        operation = operation,
        model = model,
        component = "gateway"
    )
}

/// Create a span for a session action
pub fn session_span(action: &str, chat_id: i64) -> tracing::Span {
    tracing::info_span!(
        "session_action",
        action = action,
        chat_id = chat_id,
        component = "session"
    )
}

/// Create a span for Telegram bot operations
pub fn telegram_span(operation: &str, user_id: Option<i64>) -> tracing::Span {
    tracing::info_span!(
        "telegram_operation",
        operation = operation,
        user_id = user_id,
        component = "telegram"
    )
}

/// Record a model gateway call
pub fn record_gateway_metrics(operation: &str, success: bool, duration: Duration) {
    let operation = operation.to_string();
    metrics::counter!(
        "gateway_requests_total",
        "operation" => operation.clone(),
        "result" => if success { "success" } else { "failure" }
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());
}

/// Record a session state change
pub fn record_session_transition(from: &str, to: &str) {
    metrics::counter!(
        "session_transitions_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// Record the outcome of a recipe card share
pub fn record_share_metrics(outcome: &str, success: bool) {
    metrics::counter!(
        "recipe_card_shares_total",
        "outcome" => outcome.to_string(),
        "result" => if success { "success" } else { "failure" }
    )
    .increment(1);
}

/// Record an incoming image
pub fn record_capture_metrics(origin: &str, size_bytes: u64) {
    metrics::counter!("captured_images_total", "origin" => origin.to_string()).increment(1);
    metrics::histogram!("captured_image_size_bytes").record(size_bytes as f64);
}

/// Record an error by type and component
pub fn record_error_metrics(error_type: &str, component: &str) {
    metrics::counter!(
        "errors_total",
        "type" => error_type.to_string(),
        "component" => component.to_string()
    )
    .increment(1);
}

/// Record Telegram message processing metrics
pub fn record_telegram_message(message_type: &str) {
    let message_type = message_type.to_string();
    metrics::counter!("telegram_messages_total", "type" => message_type).increment(1);
}
