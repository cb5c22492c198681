//! Labeled CSV corpus loading

use emotion_core::{Error, LabelSet, LabeledExample, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Load labeled examples from a CSV file with a header row
pub fn load_corpus(
    path: impl AsRef<Path>,
    text_column: &str,
    labels: &LabelSet,
) -> Result<Vec<LabeledExample>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::corpus(format!("Failed to open corpus {}: {}", path.display(), e))
    })?;

    let examples = read_corpus(file, text_column, labels)?;
    info!(
        "Loaded {} labeled examples from {}",
        examples.len(),
        path.display()
    );
    Ok(examples)
}

/// Parse labeled examples from any CSV reader
///
/// Label cells are parsed as numbers and any non-zero value counts as
/// active. Columns other than the text column and the labels are ignored.
pub fn read_corpus<R: Read>(
    reader: R,
    text_column: &str,
    labels: &LabelSet,
) -> Result<Vec<LabeledExample>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::corpus(format!("Failed to read corpus header: {}", e)))?
        .clone();

    let column_index = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim() == name)
            .ok_or_else(|| Error::corpus(format!("Corpus is missing column '{}'", name)))
    };

    let text_idx = column_index(text_column)?;
    let label_idx = labels
        .iter()
        .map(|label| column_index(label.as_str()))
        .collect::<Result<Vec<_>>>()?;

    let mut examples = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        // Header is line 1
        let line = row + 2;
        let record =
            record.map_err(|e| Error::corpus(format!("Malformed CSV at line {}: {}", line, e)))?;

        let text = record.get(text_idx).unwrap_or_default().to_string();
        let indicators = label_idx
            .iter()
            .zip(labels.iter())
            .map(|(&idx, label)| {
                let cell = record.get(idx).unwrap_or_default();
                parse_indicator(cell).ok_or_else(|| {
                    Error::corpus(format!(
                        "Invalid value '{}' for label '{}' at line {}",
                        cell, label, line
                    ))
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        examples.push(LabeledExample::new(text, indicators));
    }

    debug!(
        "Parsed {} rows with {} label columns",
        examples.len(),
        labels.len()
    );
    Ok(examples)
}

fn parse_indicator(cell: &str) -> Option<u8> {
    let value: f64 = cell.trim().parse().ok()?;
    if value.is_nan() {
        return None;
    }
    Some(u8::from(value != 0.0))
}
