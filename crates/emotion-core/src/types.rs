//! Core types for emotion classification

use crate::error::{Error, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Label columns used when no explicit label set is configured
pub const DEFAULT_EMOTIONS: [&str; 5] = ["anger", "annoyance", "neutral", "joy", "optimism"];

/// A text paired with one binary indicator per label, in label-set order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    /// Example text
    pub text: String,

    /// 0/1 indicator per label
    pub labels: Vec<u8>,
}

impl LabeledExample {
    /// Create a new labeled example
    pub fn new(text: impl Into<String>, labels: Vec<u8>) -> Self {
        Self {
            text: text.into(),
            labels,
        }
    }
}

/// Ordered list of emotion names, fixed at training time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Build a label set, rejecting empty and duplicated names
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(Error::config("label set cannot be empty"));
        }
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(Error::config(format!("label {} is blank", i)));
            }
            if labels[..i].contains(label) {
                return Err(Error::config(format!("duplicate label '{}'", label)));
            }
        }
        Ok(Self(labels))
    }

    /// The default five-emotion label set
    pub fn default_emotions() -> Self {
        Self(DEFAULT_EMOTIONS.iter().map(|s| s.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::default_emotions()
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Label → indicator mapping that keeps label-set order when serialized
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmotionScores(Vec<(String, u8)>);

impl EmotionScores {
    /// Zip a label set with one row of classifier output
    pub fn from_row(labels: &LabelSet, row: &[u8]) -> Result<Self> {
        if labels.len() != row.len() {
            return Err(Error::prediction(format!(
                "model produced {} outputs for {} labels",
                row.len(),
                labels.len()
            )));
        }
        Ok(Self(
            labels
                .iter()
                .zip(row)
                .map(|(label, &value)| (label.clone(), value))
                .collect(),
        ))
    }

    pub fn get(&self, label: &str) -> Option<u8> {
        self.0
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| *value)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels whose indicator is 1, in label order
    pub fn active(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|(_, value)| *value == 1)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl Serialize for EmotionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = EmotionScores;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of emotion name to 0 or 1")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, u8>()? {
                    entries.push((name, value));
                }
                Ok(EmotionScores(entries))
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

/// Per-text prediction returned to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The (preprocessed) input text
    pub text: String,

    /// One indicator per label, in label-set order
    pub emotions: EmotionScores,

    /// Labels predicted active, in label-set order
    pub dominant_emotions: Vec<String>,
}

impl PredictionResult {
    /// Build a result from one classifier output row
    pub fn from_row(text: impl Into<String>, labels: &LabelSet, row: &[u8]) -> Result<Self> {
        let emotions = EmotionScores::from_row(labels, row)?;
        let dominant_emotions = emotions.active();
        Ok(Self {
            text: text.into(),
            emotions,
            dominant_emotions,
        })
    }
}
