//! End-to-end training: corpus, split, fit, evaluate

use crate::config::TrainingConfig;
use crate::corpus::load_corpus;
use crate::evaluate::TrainingReport;
use crate::pipeline::EmotionPipeline;
use crate::split::train_test_split;
use emotion_core::{LabelSet, LabeledExample, Result};
use std::path::Path;
use tracing::info;

/// A freshly fitted pipeline with its label set and evaluation
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub pipeline: EmotionPipeline,
    pub labels: LabelSet,
    pub report: TrainingReport,
}

/// Split, fit on the training partition, and evaluate on the held-out rest
pub fn train(examples: &[LabeledExample], config: &TrainingConfig) -> Result<TrainedModel> {
    config.validate()?;

    let (train_set, test_set) = train_test_split(examples, config.test_size, config.seed)?;
    info!(
        "Fitting on {} examples ({} held out)",
        train_set.len(),
        test_set.len()
    );

    let pipeline = EmotionPipeline::fit(&train_set, config)?;

    let test_texts: Vec<&str> = test_set.iter().map(|e| e.text.as_str()).collect();
    let truth: Vec<Vec<u8>> = test_set.iter().map(|e| e.labels.clone()).collect();
    let predicted = pipeline.predict(&test_texts)?;

    let report = TrainingReport::evaluate(
        &config.labels,
        &truth,
        &predicted,
        train_set.len(),
        pipeline.vocabulary_size(),
    )?;
    report.log();

    Ok(TrainedModel {
        pipeline,
        labels: config.labels.clone(),
        report,
    })
}

/// Load the CSV corpus at `path` and train on it
pub fn train_from_corpus(path: impl AsRef<Path>, config: &TrainingConfig) -> Result<TrainedModel> {
    config.validate()?;
    let examples = load_corpus(path, &config.text_column, &config.labels)?;
    train(&examples, config)
}
