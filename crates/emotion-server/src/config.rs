//! Server configuration
//!
//! Settings are layered, later sources winning:
//! built-in defaults, an optional YAML file, environment variables, then
//! command-line flags.

use emotion_classifiers::{ArtifactPaths, TrainingConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variables recognized as top-level overrides
pub const ENV_KEYS: [&str; 9] = [
    "PORT",
    "HOST",
    "APP_ENV",
    "MODEL_PATH",
    "LABELS_PATH",
    "CSV_PATH",
    "MAX_BATCH_SIZE",
    "MAX_TEXT_CHARS",
    "MAX_BODY_BYTES",
];

/// Deployment profile selected by `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Development,
    Testing,
    Production,
}

impl Profile {
    /// Parse a profile name, ignoring case and surrounding whitespace
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" => Some(Self::Development),
            "testing" => Some(Self::Testing),
            "production" => Some(Self::Production),
            _ => None,
        }
    }

    /// Resolve a profile name; unknown names fall back to development
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    pub fn debug(self) -> bool {
        matches!(self, Self::Development | Self::Testing)
    }

    pub fn testing(self) -> bool {
        matches!(self, Self::Testing)
    }
}

/// Complete server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Listen address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Profile name (development, testing, production)
    pub app_env: String,

    /// Serialized model artifact
    pub model_path: PathBuf,

    /// Serialized label set artifact
    pub labels_path: PathBuf,

    /// Labeled CSV corpus used when the model must be trained
    pub csv_path: PathBuf,

    /// Maximum number of texts per batch request
    pub max_batch_size: usize,

    /// Maximum characters per text
    pub max_text_chars: usize,

    /// Maximum request body size in bytes
    pub max_body_bytes: usize,

    /// Training hyper-parameters
    pub training: TrainingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        let paths = ArtifactPaths::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            app_env: "development".to_string(),
            model_path: paths.model_path,
            labels_path: paths.labels_path,
            csv_path: paths.corpus_path,
            max_batch_size: 256,
            max_text_chars: 10_000,
            max_body_bytes: 1024 * 1024,
            training: TrainingConfig::default(),
        }
    }
}

/// Command-line values that take precedence over every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the file at `config_path` (if it exists), the
    /// process environment and CLI overrides
    pub fn load(config_path: &Path, overrides: &Overrides) -> anyhow::Result<Self> {
        let env: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
            .collect();
        Self::from_sources(Some(config_path), env, overrides)
    }

    /// Layer the given sources over the defaults
    pub fn from_sources(
        config_path: Option<&Path>,
        env: HashMap<String, String>,
        overrides: &Overrides,
    ) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(false),
            );
        }

        let env: HashMap<String, String> = env
            .into_iter()
            .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
            .collect();
        builder = builder.add_source(config::Environment::default().source(Some(env)));

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply(overrides);
        settings.validate()?;
        Ok(settings)
    }

    fn apply(&mut self, overrides: &Overrides) {
        if let Some(host) = &overrides.host {
            self.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(path) = &overrides.model_path {
            self.model_path = path.clone();
        }
        if let Some(path) = &overrides.labels_path {
            self.labels_path = path.clone();
        }
        if let Some(path) = &overrides.csv_path {
            self.csv_path = path.clone();
        }
    }

    /// Reject limits that would make every request fail
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_batch_size == 0 {
            anyhow::bail!("max_batch_size must be at least 1");
        }
        if self.max_text_chars == 0 {
            anyhow::bail!("max_text_chars must be at least 1");
        }
        if self.max_body_bytes == 0 {
            anyhow::bail!("max_body_bytes must be at least 1");
        }
        self.training.validate()?;
        Ok(())
    }

    pub fn profile(&self) -> Profile {
        Profile::from_name(&self.app_env)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.model_path, &self.labels_path, &self.csv_path)
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
