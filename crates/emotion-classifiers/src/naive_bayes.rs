//! Multinomial naive Bayes for sparse, count-like features

use crate::tfidf::SparseVector;
use emotion_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Multinomial naive Bayes estimator over one binary (or single-valued) target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    alpha: f64,
    n_features: usize,
    /// Distinct target values seen during fit, ascending
    classes: Vec<u8>,
    class_log_prior: Vec<f64>,
    /// `[class][feature]` smoothed log probabilities
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    /// Fit on sparse rows `x` with targets `y`
    pub fn fit(x: &[SparseVector], y: &[u8], n_features: usize, alpha: f64) -> Result<Self> {
        if x.is_empty() {
            return Err(Error::training("cannot fit naive Bayes on zero samples"));
        }
        if x.len() != y.len() {
            return Err(Error::training(format!(
                "{} feature rows but {} targets",
                x.len(),
                y.len()
            )));
        }
        if alpha.is_nan() || alpha <= 0.0 {
            return Err(Error::training(format!("alpha must be positive, got {}", alpha)));
        }

        let mut classes: Vec<u8> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0.0f64; n_features]; classes.len()];

        for (row, target) in x.iter().zip(y) {
            // classes is sorted and contains every target
            let class_idx = classes.binary_search(target).unwrap_or_else(|idx| idx);
            class_count[class_idx] += 1;
            for &(feature, value) in row {
                if feature >= n_features {
                    return Err(Error::training(format!(
                        "feature index {} out of range for {} features",
                        feature, n_features
                    )));
                }
                if value < 0.0 {
                    return Err(Error::training("negative feature values are not allowed"));
                }
                feature_count[class_idx][feature] += value;
            }
        }

        let n_samples = x.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64).ln() - n_samples.ln())
            .collect();

        let feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + alpha * n_features as f64;
                let log_total = total.ln();
                counts
                    .into_iter()
                    .map(|count| (count + alpha).ln() - log_total)
                    .collect()
            })
            .collect();

        Ok(Self {
            alpha,
            n_features,
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Unnormalized log posterior per class
    pub fn joint_log_likelihood(&self, row: &SparseVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + row
                        .iter()
                        .filter(|(feature, _)| *feature < self.n_features)
                        .map(|&(feature, value)| value * log_probs[feature])
                        .sum::<f64>()
            })
            .collect()
    }

    /// Most likely class; ties resolve to the smaller class value
    pub fn predict_one(&self, row: &SparseVector) -> u8 {
        let jll = self.joint_log_likelihood(row);
        let mut best = 0;
        for (idx, score) in jll.iter().enumerate().skip(1) {
            if *score > jll[best] {
                best = idx;
            }
        }
        self.classes[best]
    }

    pub fn predict(&self, x: &[SparseVector]) -> Vec<u8> {
        x.iter().map(|row| self.predict_one(row)).collect()
    }

    pub fn classes(&self) -> &[u8] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Structural checks for a deserialized estimator
    pub(crate) fn check_consistency(&self) -> Result<()> {
        let n_classes = self.classes.len();
        if n_classes == 0
            || self.class_log_prior.len() != n_classes
            || self.feature_log_prob.len() != n_classes
            || self
                .feature_log_prob
                .iter()
                .any(|log_probs| log_probs.len() != self.n_features)
        {
            return Err(Error::artifact("naive Bayes estimator has inconsistent shapes"));
        }
        Ok(())
    }
}
