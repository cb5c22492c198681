//! One independent estimator per output label

use crate::naive_bayes::MultinomialNb;
use crate::tfidf::SparseVector;
use emotion_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Multi-label wrapper fitting one [`MultinomialNb`] per target column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiOutputClassifier {
    estimators: Vec<MultinomialNb>,
}

impl MultiOutputClassifier {
    /// Fit column-wise on targets `y` (one row of indicators per sample)
    pub fn fit(x: &[SparseVector], y: &[Vec<u8>], n_features: usize, alpha: f64) -> Result<Self> {
        let n_outputs = y
            .first()
            .map(Vec::len)
            .ok_or_else(|| Error::training("cannot fit on zero samples"))?;
        if n_outputs == 0 {
            return Err(Error::training("targets must have at least one column"));
        }
        if let Some(row) = y.iter().position(|targets| targets.len() != n_outputs) {
            return Err(Error::training(format!(
                "target row {} has {} columns, expected {}",
                row,
                y[row].len(),
                n_outputs
            )));
        }

        let estimators = (0..n_outputs)
            .map(|column| {
                let targets: Vec<u8> = y.iter().map(|targets| targets[column]).collect();
                MultinomialNb::fit(x, &targets, n_features, alpha)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { estimators })
    }

    /// One indicator row per input row, columns in fit order
    pub fn predict(&self, x: &[SparseVector]) -> Vec<Vec<u8>> {
        x.iter()
            .map(|row| {
                self.estimators
                    .iter()
                    .map(|estimator| estimator.predict_one(row))
                    .collect()
            })
            .collect()
    }

    pub fn n_outputs(&self) -> usize {
        self.estimators.len()
    }

    pub(crate) fn check_consistency(&self, n_features: usize) -> Result<()> {
        if self.estimators.is_empty() {
            return Err(Error::artifact("classifier has no estimators"));
        }
        for estimator in &self.estimators {
            estimator.check_consistency()?;
            if estimator.n_features() != n_features {
                return Err(Error::artifact(format!(
                    "estimator expects {} features but vectorizer produces {}",
                    estimator.n_features(),
                    n_features
                )));
            }
        }
        Ok(())
    }
}
