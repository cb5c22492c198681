//! Emotion Server
//!
//! HTTP API over a multi-label emotion classifier.
//!
//! The router only sees the classifier through
//! [`EmotionClassifier`](emotion_classifiers::EmotionClassifier), so the
//! trained model is injected at startup and tests can substitute a double.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;
pub mod validation;

pub use config::{Profile, Settings};
pub use error::ApiError;
pub use routes::{create_router, AppState};
