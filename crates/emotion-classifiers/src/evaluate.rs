//! Held-out evaluation of a fitted pipeline

use emotion_core::{Error, LabelSet, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Binary classification metrics for one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub label: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of held-out examples where the label is active
    pub support: usize,
}

impl LabelMetrics {
    /// Compute metrics from parallel truth/prediction columns
    pub fn compute(label: impl Into<String>, truth: &[u8], predicted: &[u8]) -> Self {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        let mut correct = 0usize;

        for (&t, &p) in truth.iter().zip(predicted) {
            match (t != 0, p != 0) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
            if (t != 0) == (p != 0) {
                correct += 1;
            }
        }

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            label: label.into(),
            accuracy: ratio(correct, truth.len()),
            precision,
            recall,
            f1,
            support: tp + fn_,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub train_size: usize,
    pub test_size: usize,
    pub vocabulary_size: usize,
    /// Per-label metrics in label-set order; empty when nothing was held out
    pub labels: Vec<LabelMetrics>,
}

impl TrainingReport {
    /// Build a report by comparing held-out truth rows with predicted rows
    pub fn evaluate(
        labels: &LabelSet,
        truth: &[Vec<u8>],
        predicted: &[Vec<u8>],
        train_size: usize,
        vocabulary_size: usize,
    ) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(Error::training(format!(
                "{} truth rows but {} predicted rows",
                truth.len(),
                predicted.len()
            )));
        }

        let metrics = if truth.is_empty() {
            Vec::new()
        } else {
            labels
                .iter()
                .enumerate()
                .map(|(column, label)| {
                    let t: Vec<u8> = truth.iter().map(|row| row[column]).collect();
                    let p: Vec<u8> = predicted.iter().map(|row| row[column]).collect();
                    LabelMetrics::compute(label.as_str(), &t, &p)
                })
                .collect()
        };

        Ok(Self {
            train_size,
            test_size: truth.len(),
            vocabulary_size,
            labels: metrics,
        })
    }

    /// Unweighted mean F1 across labels
    pub fn macro_f1(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().map(|m| m.f1).sum::<f64>() / self.labels.len() as f64
    }

    pub fn log(&self) {
        info!(
            "Training complete: {} train / {} test examples, {} features",
            self.train_size, self.test_size, self.vocabulary_size
        );
        for m in &self.labels {
            info!(
                "  {:<12} accuracy={:.3} precision={:.3} recall={:.3} f1={:.3} support={}",
                m.label, m.accuracy, m.precision, m.recall, m.f1, m.support
            );
        }
    }
}
