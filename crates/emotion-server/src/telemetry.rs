//! Logging and Prometheus metrics initialization

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use tracing::info;

pub const REQUESTS_TOTAL: &str = "emotion_requests_total";
pub const ERRORS_TOTAL: &str = "emotion_errors_total";
pub const INFERENCE_LATENCY_US: &str = "emotion_inference_latency_us";

const DEFAULT_FILTER: &str = "emotion=info,tower_http=warn";
const VERBOSE_FILTER: &str = "emotion=debug,tower_http=debug";

/// Log filter directives: verbose wins, then `RUST_LOG`, then the default
pub fn filter_directives(verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return VERBOSE_FILTER.to_string();
    }
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => directives.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize tracing/logging
///
/// `json` switches the fmt layer to structured JSON lines.
pub fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Install the global Prometheus recorder and return its handle for rendering
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(REQUESTS_TOTAL, "Total number of requests by endpoint");
    metrics::describe_counter!(ERRORS_TOTAL, "Total number of error responses by kind");
    metrics::describe_histogram!(
        INFERENCE_LATENCY_US,
        metrics::Unit::Microseconds,
        "Model inference latency in microseconds by endpoint"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}

pub fn record_request(endpoint: &'static str) {
    metrics::counter!(REQUESTS_TOTAL, "endpoint" => endpoint).increment(1);
}

pub fn record_error(kind: &'static str) {
    metrics::counter!(ERRORS_TOTAL, "kind" => kind).increment(1);
}

pub fn record_inference(endpoint: &'static str, elapsed: Duration) {
    metrics::histogram!(INFERENCE_LATENCY_US, "endpoint" => endpoint)
        .record(elapsed.as_micros() as f64);
}
