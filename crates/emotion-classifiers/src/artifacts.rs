//! On-disk persistence of the fitted pipeline and its label set
//!
//! Both artifacts are JSON. The model carries a format version and the
//! labels file is a plain array of strings. Writes go to a sibling
//! temporary file first and are renamed into place.

use crate::config::ArtifactPaths;
use crate::pipeline::EmotionPipeline;
use emotion_core::{Error, LabelSet, Result};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Load both artifacts
///
/// Returns `Ok(None)` when either file does not exist. Every other failure
/// (unreadable file, bad JSON, unsupported version, arity mismatch) is an
/// [`Error::Artifact`].
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<Option<(EmotionPipeline, LabelSet)>> {
    let model_bytes = match read_optional(&paths.model_path)? {
        Some(bytes) => bytes,
        None => return Ok(None),
    };
    let label_bytes = match read_optional(&paths.labels_path)? {
        Some(bytes) => bytes,
        None => return Ok(None),
    };

    let pipeline: EmotionPipeline = serde_json::from_slice(&model_bytes).map_err(|e| {
        Error::artifact(format!(
            "Failed to parse model {}: {}",
            paths.model_path.display(),
            e
        ))
    })?;
    pipeline.check_consistency()?;

    let names: Vec<String> = serde_json::from_slice(&label_bytes).map_err(|e| {
        Error::artifact(format!(
            "Failed to parse labels {}: {}",
            paths.labels_path.display(),
            e
        ))
    })?;
    let labels = LabelSet::new(names).map_err(|e| {
        Error::artifact(format!(
            "Invalid labels in {}: {}",
            paths.labels_path.display(),
            e
        ))
    })?;

    if labels.len() != pipeline.n_outputs() {
        return Err(Error::artifact(format!(
            "label set has {} labels but model has {} outputs",
            labels.len(),
            pipeline.n_outputs()
        )));
    }

    debug!(
        "Read artifacts {} and {}",
        paths.model_path.display(),
        paths.labels_path.display()
    );
    Ok(Some((pipeline, labels)))
}

/// Persist the pipeline and label set, creating parent directories as needed
pub fn save_artifacts(
    paths: &ArtifactPaths,
    pipeline: &EmotionPipeline,
    labels: &LabelSet,
) -> Result<()> {
    if labels.len() != pipeline.n_outputs() {
        return Err(Error::artifact(format!(
            "refusing to save {} labels for a model with {} outputs",
            labels.len(),
            pipeline.n_outputs()
        )));
    }

    write_json_atomic(&paths.model_path, pipeline)?;
    write_json_atomic(&paths.labels_path, labels)?;
    Ok(())
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Artifact {} not found", path.display());
            Ok(None)
        }
        Err(e) => Err(Error::artifact(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = (|| -> Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        serde_json::to_writer(&mut file, value)?;
        file.flush()?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            warn!("Failed to remove {}: {}", tmp_path.display(), e);
        }
    }
    result
}
