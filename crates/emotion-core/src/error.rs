//! Error types for the emotion classification service

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for emotion classification operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Inference attempted before the model finished loading
    #[error("{0}")]
    NotReady(String),

    /// The model manager was asked to initialize twice
    #[error("model already initialized")]
    AlreadyInitialized,

    /// Training corpus could not be read or is malformed
    #[error("corpus error: {0}")]
    Corpus(String),

    /// Fitting the pipeline failed
    #[error("training error: {0}")]
    Training(String),

    /// A persisted artifact exists but cannot be used
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Inference failed
    #[error("prediction error: {0}")]
    Prediction(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The error returned by every inference entry point before initialization
    pub fn not_ready() -> Self {
        Self::NotReady("Model not loaded. Initialize the classifier first.".to_string())
    }

    /// Create a new corpus error
    pub fn corpus(msg: impl Into<String>) -> Self {
        Self::Corpus(msg.into())
    }

    /// Create a new training error
    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training(msg.into())
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new prediction error
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error means "the manager was never initialized"
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }
}
