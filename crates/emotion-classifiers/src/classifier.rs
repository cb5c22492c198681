//! Classifier trait consumed by the HTTP layer

use async_trait::async_trait;
use emotion_core::{LabelSet, PredictionResult, Result};

/// Trait for multi-label emotion classifiers
///
/// The server only depends on this seam, so tests can swap in a double
/// for the trained [`ModelManager`](crate::ModelManager).
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Predict the emotions of a single, already preprocessed text
    async fn predict(&self, text: &str) -> Result<PredictionResult>;

    /// Predict many texts with one batched inference call.
    ///
    /// Results are returned in input order. One failure fails the batch.
    async fn predict_batch(&self, texts: &[String]) -> Result<Vec<PredictionResult>>;

    /// The ordered label set
    fn emotions(&self) -> Result<LabelSet>;

    /// Get the classifier name
    fn name(&self) -> &str;
}
