//! Request body validation
//!
//! Checks run in a fixed order and the first failing check decides the
//! response, down to the first bad item of a batch. Validation never
//! touches the model.

use crate::error::ApiError;
use serde_json::{Map, Value};

/// Request size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_batch_size: usize,
    pub max_text_chars: usize,
}

/// Parse a request body into a non-empty JSON object
///
/// A missing body, invalid JSON, a non-object or an empty object all count
/// as "no data".
pub fn parse_body(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Some(map),
        _ => None,
    }
}

/// Validate a single prediction request and return its raw text
pub fn validate_single(body: &[u8], limits: &Limits) -> Result<String, ApiError> {
    let data = parse_body(body).ok_or_else(|| ApiError::validation("No data provided"))?;

    let text = data
        .get("text")
        .ok_or_else(|| ApiError::validation("No text field provided"))?;

    let text = match text.as_str() {
        Some(s) if !s.is_empty() => s,
        _ => return Err(ApiError::validation("Text field must be a non-empty string")),
    };

    if text.chars().count() > limits.max_text_chars {
        return Err(ApiError::validation(format!(
            "Text exceeds maximum length of {} characters",
            limits.max_text_chars
        )));
    }

    Ok(text.to_string())
}

/// Validate a batch prediction request and return its raw texts in order
pub fn validate_batch(body: &[u8], limits: &Limits) -> Result<Vec<String>, ApiError> {
    let data = parse_body(body).ok_or_else(|| ApiError::validation("No data provided"))?;

    let texts = data
        .get("texts")
        .ok_or_else(|| ApiError::validation("No texts field provided"))?;

    let items = texts
        .as_array()
        .ok_or_else(|| ApiError::validation("Texts field must be a list"))?;

    if items.is_empty() {
        return Err(ApiError::validation("Texts list cannot be empty"));
    }

    if items.len() > limits.max_batch_size {
        return Err(ApiError::PayloadTooLarge(vec![format!(
            "Batch size {} exceeds maximum of {}",
            items.len(),
            limits.max_batch_size
        )]));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item.as_str() {
            Some(s) if s.is_empty() => Err(ApiError::validation(format!(
                "Item {} in texts list must be a non-empty string",
                i
            ))),
            Some(s) if s.chars().count() > limits.max_text_chars => {
                Err(ApiError::validation(format!(
                    "Item {} in texts list exceeds maximum length of {} characters",
                    i, limits.max_text_chars
                )))
            }
            Some(s) => Ok(s.to_string()),
            None => Err(ApiError::validation(format!(
                "Item {} in texts list must be a non-empty string",
                i
            ))),
        })
        .collect()
}
