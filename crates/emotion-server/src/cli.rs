//! Command-line interface

use crate::config::Overrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "emotion-server")]
#[command(about = "Multi-label emotion classification API", version, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "EMOTION_CONFIG", default_value = "emotion.yaml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Listen address
    #[arg(short = 'l', long, global = true)]
    pub host: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, global = true)]
    pub port: Option<u16>,

    /// Model artifact path
    #[arg(long, global = true)]
    pub model_path: Option<PathBuf>,

    /// Label set artifact path
    #[arg(long, global = true)]
    pub labels_path: Option<PathBuf>,

    /// Training corpus path
    #[arg(long, global = true)]
    pub csv_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load or train the model, then serve the HTTP API (default)
    Serve,

    /// Train a new model from the corpus and overwrite the artifacts
    Train,

    /// Load or train the model and print predictions as JSON
    Predict {
        /// Texts to classify
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            model_path: self.model_path.clone(),
            labels_path: self.labels_path.clone(),
            csv_path: self.csv_path.clone(),
        }
    }

    pub fn subcommand(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
