//! Configuration for training and artifact locations

use emotion_core::{Error, LabelSet, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hyper-parameters and corpus layout used when fitting a new model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Name of the CSV column holding the text
    #[serde(default = "default_text_column")]
    pub text_column: String,

    /// Label columns, in output order
    #[serde(default)]
    pub labels: LabelSet,

    /// Fraction of the corpus held out for evaluation
    #[serde(default = "default_test_size")]
    pub test_size: f64,

    /// Seed for the train/test shuffle
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Vocabulary cap (most frequent terms win)
    #[serde(default = "default_max_features")]
    pub max_features: Option<usize>,

    /// Inclusive n-gram range
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    /// Additive smoothing for the naive Bayes estimators
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl TrainingConfig {
    /// Reject settings the pipeline cannot fit with
    pub fn validate(&self) -> Result<()> {
        LabelSet::new(self.labels.iter().cloned())?;
        if self.text_column.trim().is_empty() {
            return Err(Error::config("text_column cannot be empty"));
        }
        if !(0.0..1.0).contains(&self.test_size) {
            return Err(Error::config(format!(
                "test_size must be in [0, 1), got {}",
                self.test_size
            )));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::config(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }
        if self.max_features == Some(0) {
            return Err(Error::config("max_features must be positive"));
        }
        if self.alpha.is_nan() || self.alpha <= 0.0 {
            return Err(Error::config(format!("alpha must be positive, got {}", self.alpha)));
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            text_column: default_text_column(),
            labels: LabelSet::default(),
            test_size: default_test_size(),
            seed: default_seed(),
            max_features: default_max_features(),
            ngram_range: default_ngram_range(),
            alpha: default_alpha(),
        }
    }
}

/// Where the model, its label set, and the training corpus live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Serialized pipeline
    pub model_path: PathBuf,

    /// Serialized label set
    pub labels_path: PathBuf,

    /// Labeled CSV used when training is needed
    pub corpus_path: PathBuf,
}

impl ArtifactPaths {
    pub fn new(
        model_path: impl Into<PathBuf>,
        labels_path: impl Into<PathBuf>,
        corpus_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            labels_path: labels_path.into(),
            corpus_path: corpus_path.into(),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::new(
            "emotion_classifier_model.json",
            "emotion_labels.json",
            "goemotionsfinal.csv",
        )
    }
}

fn default_text_column() -> String {
    "text".to_string()
}

fn default_test_size() -> f64 {
    0.3
}

fn default_seed() -> u64 {
    42
}

fn default_max_features() -> Option<usize> {
    Some(5000)
}

fn default_ngram_range() -> (usize, usize) {
    (1, 2)
}

fn default_alpha() -> f64 {
    1.0
}
