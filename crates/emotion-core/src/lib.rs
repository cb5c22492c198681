//! Emotion Core
//!
//! Core types, traits, and utilities shared across the emotion classification
//! service components.
//!
//! This crate provides:
//! - Error types and result handling
//! - Domain types for labeled examples, label sets, and prediction results
//! - Text preprocessing applied before inference

pub mod error;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use text::preprocess_text;
pub use types::{EmotionScores, LabelSet, LabeledExample, PredictionResult, DEFAULT_EMOTIONS};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::text::preprocess_text;
    pub use crate::types::{EmotionScores, LabelSet, LabeledExample, PredictionResult};
}
