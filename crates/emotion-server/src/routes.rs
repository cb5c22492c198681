//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::config::Settings;
use crate::error::ApiError;
use crate::telemetry::{record_inference, record_request};
use crate::validation::{validate_batch, validate_single, Limits};
use emotion_classifiers::EmotionClassifier;
use emotion_core::{preprocess_text, PredictionResult};

pub const API_VERSION: &str = "1.0.0";

/// Text run through the model by the health check
pub const HEALTH_SENTINEL: &str = "Test message";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn EmotionClassifier>,
    pub limits: Limits,
    pub max_body_bytes: usize,
    /// Prometheus handle for rendering; `None` when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn EmotionClassifier>, settings: &Settings) -> Self {
        Self {
            classifier,
            limits: Limits {
                max_batch_size: settings.max_batch_size,
                max_text_chars: settings.max_text_chars,
            },
            max_body_bytes: settings.max_body_bytes,
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.max_body_bytes;

    Router::new()
        .route("/", get(index))
        .route("/emotions", get(emotions))
        .route("/predict", post(predict))
        .route("/predict-batch", post(predict_batch))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Buffered request body, with over-limit bodies reported as JSON
fn read_body(
    body: Result<Bytes, BytesRejection>,
    max_body_bytes: usize,
) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(vec![format!(
                "Request body exceeds maximum of {} bytes",
                max_body_bytes
            )])
        } else {
            debug!("Failed to read request body: {}", rejection);
            ApiError::validation("No data provided")
        }
    })
}

async fn index() -> Json<serde_json::Value> {
    record_request("index");
    Json(json!({
        "message": "Welcome to the Emotion Classification API",
        "version": API_VERSION,
        "endpoints": {
            "/": "This information",
            "/emotions": "Get available emotions for detection",
            "/predict": "Predict emotions for a single text",
            "/predict-batch": "Predict emotions for multiple texts",
            "/health": "Check API health"
        }
    }))
}

async fn emotions(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    record_request("emotions");
    let labels = state.classifier.emotions().map_err(|e| {
        error!("Failed to list emotions: {}", e);
        ApiError::Internal(e.to_string())
    })?;
    Ok(Json(json!({ "emotions": labels })))
}

async fn predict(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    record_request("predict");
    let body = read_body(body, state.max_body_bytes)?;

    let raw = validate_single(&body, &state.limits).map_err(|e| {
        debug!("Rejected predict request: {}", e);
        e
    })?;
    let text = preprocess_text(Some(raw.as_str()));

    let start = Instant::now();
    let result = state.classifier.predict(&text).await.map_err(|e| {
        error!("Prediction failed: {}", e);
        ApiError::Internal(format!("Prediction error: {}", e))
    })?;
    record_inference("predict", start.elapsed());

    debug!(
        "Predicted {:?} in {:?}",
        result.dominant_emotions,
        start.elapsed()
    );
    Ok(Json(result))
}

async fn predict_batch(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Vec<PredictionResult>>, ApiError> {
    record_request("predict_batch");
    let body = read_body(body, state.max_body_bytes)?;

    let raw = validate_batch(&body, &state.limits).map_err(|e| {
        debug!("Rejected batch request: {}", e);
        e
    })?;
    let texts: Vec<String> = raw.iter().map(|t| preprocess_text(Some(t.as_str()))).collect();

    let start = Instant::now();
    let results = state.classifier.predict_batch(&texts).await.map_err(|e| {
        error!("Batch prediction failed: {}", e);
        ApiError::Internal(format!("Batch prediction error: {}", e))
    })?;
    record_inference("predict_batch", start.elapsed());

    debug!("Predicted batch of {} in {:?}", results.len(), start.elapsed());
    Ok(Json(results))
}

async fn health_check(State(state): State<AppState>) -> Response {
    record_request("health");
    match state.classifier.predict(HEALTH_SENTINEL).await {
        Ok(_) => Json(json!({ "status": "healthy" })).into_response(),
        Err(e) => {
            warn!("Health check failed: {}", e);
            crate::telemetry::record_error("unhealthy");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "unhealthy", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

async fn fallback() -> ApiError {
    ApiError::NotFound
}
