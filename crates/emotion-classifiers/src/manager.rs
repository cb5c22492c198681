//! Model lifecycle: load persisted artifacts or train, then serve predictions
//!
//! A [`ModelManager`] starts Uninitialized and becomes Ready exactly once,
//! either by loading the model and label artifacts from disk or by training
//! a new pipeline from the CSV corpus and persisting it. Once Ready the
//! model is immutable and shared read-only across request handlers.

use crate::artifacts::{load_artifacts, save_artifacts};
use crate::classifier::EmotionClassifier;
use crate::config::{ArtifactPaths, TrainingConfig};
use crate::evaluate::TrainingReport;
use crate::pipeline::EmotionPipeline;
use crate::train::{train_from_corpus, TrainedModel};
use async_trait::async_trait;
use emotion_core::{Error, LabelSet, PredictionResult, Result};
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, info, warn};

/// How the manager reached the Ready state
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Both artifacts were read from disk
    Loaded,
    /// Artifacts were missing, so a new model was trained and saved
    Trained(TrainingReport),
}

/// Introspection snapshot of a ready model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub labels: LabelSet,
    pub vocabulary_size: usize,
    pub max_features: Option<usize>,
    pub ngram_range: (usize, usize),
    pub format_version: u32,
}

#[derive(Debug)]
struct ReadyModel {
    pipeline: EmotionPipeline,
    labels: LabelSet,
}

/// Owns the trained pipeline and its label set
pub struct ModelManager {
    paths: ArtifactPaths,
    config: TrainingConfig,
    model: OnceLock<ReadyModel>,
}

impl ModelManager {
    /// Create an uninitialized manager
    pub fn new(paths: ArtifactPaths, config: TrainingConfig) -> Self {
        Self {
            paths,
            config,
            model: OnceLock::new(),
        }
    }

    /// Create a manager and immediately load or train its model
    pub fn open(paths: ArtifactPaths, config: TrainingConfig) -> Result<(Self, LoadOutcome)> {
        let manager = Self::new(paths, config);
        let outcome = manager.load_or_train()?;
        Ok((manager, outcome))
    }

    /// Load persisted artifacts, training and saving a new model only when
    /// one of them does not exist
    pub fn load_or_train(&self) -> Result<LoadOutcome> {
        self.ensure_uninitialized()?;

        match load_artifacts(&self.paths)? {
            Some((pipeline, labels)) => {
                if labels != self.config.labels {
                    warn!(
                        "Persisted labels {:?} differ from configured labels {:?}; using persisted labels",
                        labels.as_slice(),
                        self.config.labels.as_slice()
                    );
                }
                self.install(pipeline, labels)?;
                info!("Model loaded successfully from disk.");
                Ok(LoadOutcome::Loaded)
            }
            None => {
                info!("Training new model...");
                let report = self.train_and_save()?;
                Ok(LoadOutcome::Trained(report))
            }
        }
    }

    /// Train from the corpus and overwrite both artifacts unconditionally
    pub fn train(&self) -> Result<TrainingReport> {
        self.ensure_uninitialized()?;
        info!("Training new model...");
        self.train_and_save()
    }

    fn train_and_save(&self) -> Result<TrainingReport> {
        let start = Instant::now();
        let TrainedModel {
            pipeline,
            labels,
            report,
        } = train_from_corpus(&self.paths.corpus_path, &self.config)?;

        save_artifacts(&self.paths, &pipeline, &labels)?;
        self.install(pipeline, labels)?;
        info!(
            "Model trained and saved successfully. ({:.2?})",
            start.elapsed()
        );
        Ok(report)
    }

    fn ensure_uninitialized(&self) -> Result<()> {
        if self.is_ready() {
            return Err(Error::AlreadyInitialized);
        }
        Ok(())
    }

    fn install(&self, pipeline: EmotionPipeline, labels: LabelSet) -> Result<()> {
        self.model
            .set(ReadyModel { pipeline, labels })
            .map_err(|_| Error::AlreadyInitialized)
    }

    fn ready(&self) -> Result<&ReadyModel> {
        self.model.get().ok_or_else(Error::not_ready)
    }

    /// Whether a model has been loaded or trained
    pub fn is_ready(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn info(&self) -> Result<ModelInfo> {
        let model = self.ready()?;
        let vectorizer = model.pipeline.vectorizer();
        Ok(ModelInfo {
            labels: model.labels.clone(),
            vocabulary_size: vectorizer.vocabulary_size(),
            max_features: vectorizer.max_features(),
            ngram_range: vectorizer.ngram_range(),
            format_version: model.pipeline.format_version(),
        })
    }

    fn predict_texts<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<PredictionResult>> {
        let model = self.ready()?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let rows = model.pipeline.predict(texts)?;
        debug!("Predicted {} texts", rows.len());

        texts
            .iter()
            .zip(rows)
            .map(|(text, row)| PredictionResult::from_row(text.as_ref(), &model.labels, &row))
            .collect()
    }
}

#[async_trait]
impl EmotionClassifier for ModelManager {
    async fn predict(&self, text: &str) -> Result<PredictionResult> {
        self.predict_texts(&[text])?
            .pop()
            .ok_or_else(|| Error::prediction("model returned no rows"))
    }

    async fn predict_batch(&self, texts: &[String]) -> Result<Vec<PredictionResult>> {
        self.predict_texts(texts)
    }

    fn emotions(&self) -> Result<LabelSet> {
        Ok(self.ready()?.labels.clone())
    }

    fn name(&self) -> &str {
        "tfidf_multinomial_nb"
    }
}
