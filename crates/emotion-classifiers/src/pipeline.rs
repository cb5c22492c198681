//! Vectorizer + multi-output classifier pipeline
//!
//! The pipeline is the replaceable learning capability behind the model
//! manager. It exposes exactly two operations:
//! - [`EmotionPipeline::fit`]: labeled examples in, fitted artifact out
//! - [`EmotionPipeline::predict`]: texts in, one indicator row per text out
//!
//! Fitting is deterministic: the same examples and configuration always
//! produce the same artifact.

use crate::config::TrainingConfig;
use crate::multi_output::MultiOutputClassifier;
use crate::tfidf::TfidfVectorizer;
use emotion_core::{Error, LabeledExample, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Artifact layout version written into every serialized pipeline
pub const PIPELINE_FORMAT_VERSION: u32 = 1;

/// Fitted TF-IDF + multinomial naive Bayes pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionPipeline {
    format_version: u32,
    vectorizer: TfidfVectorizer,
    classifier: MultiOutputClassifier,
}

impl EmotionPipeline {
    /// Fit a new pipeline on labeled examples
    pub fn fit(examples: &[LabeledExample], config: &TrainingConfig) -> Result<Self> {
        config.validate()?;
        if examples.is_empty() {
            return Err(Error::training("cannot train on an empty corpus"));
        }

        let expected = config.labels.len();
        if let Some(bad) = examples.iter().position(|e| e.labels.len() != expected) {
            return Err(Error::training(format!(
                "example {} has {} label values, expected {}",
                bad,
                examples[bad].labels.len(),
                expected
            )));
        }

        let start = Instant::now();
        let texts: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();
        let targets: Vec<Vec<u8>> = examples.iter().map(|e| e.labels.clone()).collect();

        let mut vectorizer = TfidfVectorizer::new(config.ngram_range, config.max_features)?;
        let features = vectorizer.fit_transform(&texts)?;
        let classifier = MultiOutputClassifier::fit(
            &features,
            &targets,
            vectorizer.vocabulary_size(),
            config.alpha,
        )?;

        debug!(
            "Fitted pipeline on {} examples ({} features) in {:.2?}",
            examples.len(),
            vectorizer.vocabulary_size(),
            start.elapsed()
        );

        Ok(Self {
            format_version: PIPELINE_FORMAT_VERSION,
            vectorizer,
            classifier,
        })
    }

    /// Predict one indicator row per text in a single batched pass
    pub fn predict<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Vec<u8>>> {
        let features = self.vectorizer.transform(texts);
        let rows = self.classifier.predict(&features);
        if rows.len() != texts.len() {
            return Err(Error::prediction(format!(
                "pipeline returned {} rows for {} texts",
                rows.len(),
                texts.len()
            )));
        }
        Ok(rows)
    }

    /// Output arity (one per label)
    pub fn n_outputs(&self) -> usize {
        self.classifier.n_outputs()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    /// Structural validation for pipelines read back from disk
    pub fn check_consistency(&self) -> Result<()> {
        if self.format_version != PIPELINE_FORMAT_VERSION {
            return Err(Error::artifact(format!(
                "unsupported model format version {} (expected {})",
                self.format_version, PIPELINE_FORMAT_VERSION
            )));
        }
        self.classifier
            .check_consistency(self.vectorizer.vocabulary_size())
    }
}
