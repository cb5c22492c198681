//! Integration tests for the emotion API
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot`.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use emotion_classifiers::{ArtifactPaths, EmotionClassifier, ModelManager, TrainingConfig};
use emotion_core::{Error, LabelSet, PredictionResult, Result};
use emotion_server::{create_router, AppState, Settings};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Keyword-driven classifier that counts model calls
struct MockClassifier {
    labels: LabelSet,
    fail: bool,
    calls: AtomicU32,
}

impl MockClassifier {
    fn new() -> Self {
        Self {
            labels: LabelSet::new(["anger", "joy"]).unwrap(),
            fail: false,
            calls: AtomicU32::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }

    fn classify(&self, text: &str) -> Result<PredictionResult> {
        if self.fail {
            return Err(Error::prediction("model exploded"));
        }
        let lowered = text.to_lowercase();
        let row = [
            u8::from(lowered.contains("furious")),
            u8::from(lowered.contains("happy")),
        ];
        PredictionResult::from_row(text, &self.labels, &row)
    }
}

#[async_trait]
impl EmotionClassifier for MockClassifier {
    async fn predict(&self, text: &str) -> Result<PredictionResult> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.classify(text)
    }

    async fn predict_batch(&self, texts: &[String]) -> Result<Vec<PredictionResult>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        texts.iter().map(|t| self.classify(t)).collect()
    }

    fn emotions(&self) -> Result<LabelSet> {
        if self.fail {
            return Err(Error::not_ready());
        }
        Ok(self.labels.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn app_with(classifier: Arc<dyn EmotionClassifier>, settings: &Settings) -> Router {
    create_router(AppState::new(classifier, settings))
}

fn mock_app() -> (Router, Arc<MockClassifier>) {
    let mock = Arc::new(MockClassifier::new());
    (app_with(mock.clone(), &Settings::default()), mock)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(text.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_index() {
    let (app, _) = mock_app();
    let (status, body) = send(app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to the Emotion Classification API");
    assert_eq!(body["version"], "1.0.0");
    let endpoints: Vec<&String> = body["endpoints"].as_object().unwrap().keys().collect();
    assert_eq!(endpoints, ["/", "/emotions", "/predict", "/predict-batch", "/health"]);
}

#[tokio::test]
async fn test_emotions() {
    let (app, _) = mock_app();
    let (status, body) = send(app, Method::GET, "/emotions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "emotions": ["anger", "joy"] }));

    let app = app_with(Arc::new(MockClassifier::failing()), &Settings::default());
    let (status, body) = send(app, Method::GET, "/emotions", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Model not loaded"));
}

#[tokio::test]
async fn test_predict_preprocesses_and_keeps_label_order() {
    let (app, mock) = mock_app();
    let (status, body) = send(
        app,
        Method::POST,
        "/predict",
        Some(r#"{"text": "  I am   so happy  "}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "I am so happy");
    assert_eq!(
        serde_json::to_string(&body["emotions"]).unwrap(),
        r#"{"anger":0,"joy":1}"#
    );
    assert_eq!(body["dominant_emotions"], json!(["joy"]));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_predict_validation_never_reaches_model() {
    let cases = [
        (None, "No data provided"),
        (Some("{}"), "No data provided"),
        (Some("not json"), "No data provided"),
        (Some(r#"{"txt": "hello"}"#), "No text field provided"),
        (Some(r#"{"text": ""}"#), "Text field must be a non-empty string"),
        (Some(r#"{"text": 123}"#), "Text field must be a non-empty string"),
    ];

    for (body, message) in cases {
        let (app, mock) = mock_app();
        let (status, response) = send(app, Method::POST, "/predict", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", body);
        assert_eq!(response, json!({ "error": [message] }));
        assert_eq!(mock.calls(), 0);
    }
}

#[tokio::test]
async fn test_predict_model_failure() {
    let app = app_with(Arc::new(MockClassifier::failing()), &Settings::default());
    let (status, body) = send(app, Method::POST, "/predict", Some(r#"{"text": "hi"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Prediction error: prediction error: model exploded"
    );
}

#[tokio::test]
async fn test_predict_batch() {
    let (app, mock) = mock_app();
    let (status, body) = send(
        app,
        Method::POST,
        "/predict-batch",
        Some(r#"{"texts": ["so happy", "This makes me furious", "meh"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["dominant_emotions"], json!(["joy"]));
    assert_eq!(results[1]["dominant_emotions"], json!(["anger"]));
    assert_eq!(results[2]["dominant_emotions"], json!([]));
    assert_eq!(results[1]["text"], "This makes me furious");

    // One batched model call for the whole request
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_predict_batch_validation() {
    let cases = [
        (r#"{"texts": []}"#, json!(["Texts list cannot be empty"])),
        (r#"{"texts": "not-a-list"}"#, json!(["Texts field must be a list"])),
        (r#"{"text": "x"}"#, json!(["No texts field provided"])),
        (
            r#"{"texts": ["ok", 5, ""]}"#,
            json!(["Item 1 in texts list must be a non-empty string"]),
        ),
    ];

    for (body, errors) in cases {
        let (app, mock) = mock_app();
        let (status, response) = send(app, Method::POST, "/predict-batch", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response, json!({ "error": errors }));
        assert_eq!(mock.calls(), 0);
    }
}

#[tokio::test]
async fn test_predict_batch_failure_is_all_or_nothing() {
    let app = app_with(Arc::new(MockClassifier::failing()), &Settings::default());
    let (status, body) = send(
        app,
        Method::POST,
        "/predict-batch",
        Some(r#"{"texts": ["a", "b"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Batch prediction error: "));
}

#[tokio::test]
async fn test_size_limits() {
    let settings = Settings {
        max_batch_size: 2,
        max_text_chars: 5,
        max_body_bytes: 64,
        ..Settings::default()
    };
    let mock = Arc::new(MockClassifier::new());

    let (status, body) = send(
        app_with(mock.clone(), &settings),
        Method::POST,
        "/predict-batch",
        Some(r#"{"texts": ["a", "b", "c"]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "error": ["Batch size 3 exceeds maximum of 2"] }));

    let (status, body) = send(
        app_with(mock.clone(), &settings),
        Method::POST,
        "/predict",
        Some(r#"{"text": "too long"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": ["Text exceeds maximum length of 5 characters"] })
    );

    let oversized = format!(r#"{{"text": "{}"}}"#, "x".repeat(200));
    let too_large = json!({ "error": ["Request body exceeds maximum of 64 bytes"] });
    for uri in ["/predict", "/predict-batch"] {
        let (status, body) = send(
            app_with(mock.clone(), &settings),
            Method::POST,
            uri,
            Some(&oversized),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{}", uri);
        assert_eq!(body, too_large, "{}", uri);
    }

    // Same JSON error when the client declares the length up front
    let request = Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, oversized.len())
        .body(Body::from(oversized.clone()))
        .unwrap();
    let response = app_with(mock.clone(), &settings)
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), too_large);

    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_health() {
    let (app, mock) = mock_app();
    let (status, body) = send(app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
    assert_eq!(mock.calls(), 1);

    let app = app_with(Arc::new(MockClassifier::failing()), &Settings::default());
    let (status, body) = send(app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "unhealthy");
    assert!(body["error"].as_str().unwrap().contains("model exploded"));
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = mock_app();
    let (status, body) = send(app, Method::GET, "/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let (app, _) = mock_app();
    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_uninitialized_manager_is_unhealthy() {
    let manager = ModelManager::new(ArtifactPaths::default(), TrainingConfig::default());
    let app = app_with(Arc::new(manager), &Settings::default());

    let (status, body) = send(app.clone(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Model not loaded. Initialize the classifier first."
    );

    let (status, body) = send(app, Method::POST, "/predict", Some(r#"{"text": "hi"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Prediction error: Model not loaded. Initialize the classifier first."
    );
}

#[tokio::test]
async fn test_end_to_end_with_trained_model() {
    let dir = tempfile::TempDir::new().unwrap();
    let paths = ArtifactPaths::new(
        dir.path().join("model.json"),
        dir.path().join("labels.json"),
        dir.path().join("corpus.csv"),
    );
    let mut csv = String::from("text,joy,anger\n");
    for _ in 0..5 {
        csv.push_str("I am so happy today,1,0\n");
        csv.push_str("This makes me furious,0,1\n");
    }
    std::fs::write(&paths.corpus_path, csv).unwrap();

    let config = TrainingConfig {
        labels: LabelSet::new(["joy", "anger"]).unwrap(),
        ..Default::default()
    };
    let (manager, _) = ModelManager::open(paths, config).unwrap();
    let app = app_with(Arc::new(manager), &Settings::default());

    let (status, body) = send(
        app.clone(),
        Method::POST,
        "/predict",
        Some(r#"{"text": "I am so happy today"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "text": "I am so happy today",
            "emotions": { "joy": 1, "anger": 0 },
            "dominant_emotions": ["joy"]
        })
    );

    let (status, batch) = send(
        app.clone(),
        Method::POST,
        "/predict-batch",
        Some(r#"{"texts": ["I am so happy today", "This makes me furious"]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(batch[0], body);
    assert_eq!(batch[1]["dominant_emotions"], json!(["anger"]));

    let (status, _) = send(app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
