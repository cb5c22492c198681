//! Emotion Server
//!
//! Loads (or trains) the emotion model and serves it over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use emotion_classifiers::{EmotionClassifier, LoadOutcome, ModelManager};
use emotion_core::preprocess_text;
use emotion_server::cli::{Cli, Command};
use emotion_server::config::{Profile, Settings};
use emotion_server::routes::{create_router, AppState};
use emotion_server::telemetry::{init_metrics, init_tracing};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(&cli.config, &cli.overrides())?;
    let profile = settings.profile();
    init_tracing(cli.verbose, !profile.debug());
    if Profile::parse(&settings.app_env).is_none() {
        warn!("Unknown APP_ENV '{}', using development", settings.app_env);
    }

    debug!("Settings: {:?}", settings);
    info!("Profile: {:?}", profile);

    match cli.subcommand() {
        Command::Serve => serve(settings).await,
        Command::Train => train(settings),
        Command::Predict { texts } => predict(settings, texts).await,
    }
}

async fn serve(settings: Settings) -> Result<()> {
    info!("Starting Emotion Classification API");

    let metrics_handle = init_metrics()?;
    let manager = open_manager(&settings)?;

    let state = AppState::new(Arc::new(manager), &settings).with_metrics(metrics_handle);
    let app = create_router(state);

    let addr: SocketAddr = settings
        .listen_addr()
        .parse()
        .with_context(|| format!("Invalid listen address {}", settings.listen_addr()))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn train(settings: Settings) -> Result<()> {
    let manager = ModelManager::new(settings.artifact_paths(), settings.training.clone());
    let report = manager.train().context("Training failed")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn predict(settings: Settings, texts: Vec<String>) -> Result<()> {
    let manager = open_manager(&settings)?;
    let texts: Vec<String> = texts.iter().map(|t| preprocess_text(Some(t.as_str()))).collect();
    let results = manager.predict_batch(&texts).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn open_manager(settings: &Settings) -> Result<ModelManager> {
    let paths = settings.artifact_paths();
    info!(
        "Model: {}, labels: {}, corpus: {}",
        paths.model_path.display(),
        paths.labels_path.display(),
        paths.corpus_path.display()
    );

    let (manager, outcome) = ModelManager::open(paths, settings.training.clone())
        .context("Failed to initialize the emotion model")?;
    if let LoadOutcome::Trained(report) = &outcome {
        info!("Trained new model, macro F1 {:.3}", report.macro_f1());
    }
    Ok(manager)
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
