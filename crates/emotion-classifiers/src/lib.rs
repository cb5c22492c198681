//! Emotion Classifiers
//!
//! Multi-label emotion classification with a TF-IDF vectorizer feeding one
//! multinomial naive Bayes estimator per label.
//!
//! The crate is organized bottom-up:
//! - [`tfidf`], [`naive_bayes`], [`multi_output`]: the learning primitives
//! - [`pipeline`]: the fitted vectorizer + classifier artifact
//! - [`corpus`], [`split`], [`evaluate`], [`train`]: building a model from a labeled CSV
//! - [`artifacts`]: JSON persistence of the model and its label set
//! - [`manager`]: load-or-train lifecycle and inference behind [`EmotionClassifier`]
//!
//! All inference runs on CPU against an immutable, shared model.

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod evaluate;
pub mod manager;
pub mod multi_output;
pub mod naive_bayes;
pub mod pipeline;
pub mod split;
pub mod tfidf;
pub mod train;

pub use artifacts::{load_artifacts, save_artifacts};
pub use classifier::EmotionClassifier;
pub use config::{ArtifactPaths, TrainingConfig};
pub use corpus::{load_corpus, read_corpus};
pub use evaluate::{LabelMetrics, TrainingReport};
pub use manager::{LoadOutcome, ModelInfo, ModelManager};
pub use pipeline::{EmotionPipeline, PIPELINE_FORMAT_VERSION};
pub use split::train_test_split;
pub use tfidf::{SparseVector, TfidfVectorizer};
pub use train::{train, train_from_corpus, TrainedModel};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::EmotionClassifier;
    pub use crate::config::{ArtifactPaths, TrainingConfig};
    pub use crate::manager::{LoadOutcome, ModelManager};
    pub use emotion_core::{LabelSet, PredictionResult};
}
