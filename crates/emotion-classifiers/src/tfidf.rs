//! TF-IDF text vectorizer producing sparse, L2-normalized feature rows

use emotion_core::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Words of two or more word characters, matched after lowercasing
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Sparse feature row: `(feature index, value)` pairs sorted by index
pub type SparseVector = Vec<(usize, f64)>;

/// Lowercases, tokenizes, and expands text into word n-grams
#[derive(Debug, Clone)]
pub struct Analyzer {
    token_regex: Regex,
    ngram_range: (usize, usize),
}

impl Analyzer {
    pub fn new(ngram_range: (usize, usize)) -> Result<Self> {
        let (min_n, max_n) = ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::config(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_regex = Regex::new(TOKEN_PATTERN)
            .map_err(|e| Error::internal(format!("Failed to compile token regex: {}", e)))?;

        Ok(Self {
            token_regex,
            ngram_range,
        })
    }

    /// Terms of a document, unigrams first, n-grams joined by a single space
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }
}

/// TF-IDF vectorizer with a frequency-capped vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TfidfState", into = "TfidfState")]
pub struct TfidfVectorizer {
    analyzer: Analyzer,
    max_features: Option<usize>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer
    pub fn new(ngram_range: (usize, usize), max_features: Option<usize>) -> Result<Self> {
        Ok(Self {
            analyzer: Analyzer::new(ngram_range)?,
            max_features,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        })
    }

    /// Learn the vocabulary and idf weights from training documents
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if documents.is_empty() {
            return Err(Error::training("cannot fit vectorizer on an empty corpus"));
        }

        let mut term_frequency: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let counts = count_terms(self.analyzer.analyze(doc.as_ref()));
            for (term, count) in counts {
                *term_frequency.entry(term.clone()).or_insert(0) += count;
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if term_frequency.is_empty() {
            return Err(Error::training(
                "empty vocabulary; documents contain no tokens of two or more characters",
            ));
        }

        // Most frequent terms win the cap; ties go to the alphabetically smaller term
        let mut ranked: Vec<(String, usize)> = term_frequency.into_iter().collect();
        if let Some(limit) = self.max_features {
            if ranked.len() > limit {
                ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                ranked.truncate(limit);
            }
        }

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n_documents = documents.len() as f64;
        let idf = terms
            .iter()
            .map(|term| {
                let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_documents) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();
        self.idf = idf;

        Ok(())
    }

    /// Fit, then transform the same documents
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        Ok(self.transform(documents))
    }

    /// Transform documents into L2-normalized tf-idf rows
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Vec<SparseVector> {
        documents
            .iter()
            .map(|doc| self.transform_one(doc.as_ref()))
            .collect()
    }

    fn transform_one(&self, document: &str) -> SparseVector {
        let mut row: SparseVector = count_terms(self.analyzer.analyze(document))
            .into_iter()
            .filter_map(|(term, count)| {
                self.vocabulary
                    .get(&term)
                    .map(|&idx| (idx, count as f64 * self.idf[idx]))
            })
            .collect();
        row.sort_by_key(|(idx, _)| *idx);

        let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, value) in row.iter_mut() {
                *value /= norm;
            }
        }
        row
    }

    /// Number of feature columns
    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.analyzer.ngram_range()
    }

    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    /// Feature index of a term, if it made it into the vocabulary
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }
}

fn count_terms(terms: Vec<String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// On-disk form: terms listed in feature-index order
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TfidfState {
    ngram_range: (usize, usize),
    max_features: Option<usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl From<TfidfVectorizer> for TfidfState {
    fn from(vectorizer: TfidfVectorizer) -> Self {
        let mut terms = vec![String::new(); vectorizer.vocabulary.len()];
        for (term, idx) in vectorizer.vocabulary {
            terms[idx] = term;
        }
        Self {
            ngram_range: vectorizer.analyzer.ngram_range(),
            max_features: vectorizer.max_features,
            terms,
            idf: vectorizer.idf,
        }
    }
}

impl TryFrom<TfidfState> for TfidfVectorizer {
    type Error = Error;

    fn try_from(state: TfidfState) -> Result<Self> {
        if state.terms.len() != state.idf.len() {
            return Err(Error::artifact(format!(
                "vectorizer has {} terms but {} idf weights",
                state.terms.len(),
                state.idf.len()
            )));
        }

        let analyzer = Analyzer::new(state.ngram_range)?;
        let vocabulary: HashMap<String, usize> = state
            .terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();
        if vocabulary.len() != state.idf.len() {
            return Err(Error::artifact("vectorizer vocabulary contains duplicate terms"));
        }

        Ok(Self {
            analyzer,
            max_features: state.max_features,
            vocabulary,
            idf: state.idf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_unigrams_and_bigrams() {
        let analyzer = Analyzer::new((1, 2)).unwrap();
        let terms = analyzer.analyze("I am SO happy!");

        // "I" is a single character and is dropped
        assert_eq!(
            terms,
            vec!["am", "so", "happy", "am so", "so happy"]
        );
    }

    #[test]
    fn test_analyzer_rejects_bad_range() {
        assert!(Analyzer::new((0, 2)).is_err());
        assert!(Analyzer::new((3, 2)).is_err());
    }

    #[test]
    fn test_vocabulary_sorted_and_capped() {
        let docs = ["apple apple banana", "apple cherry", "banana apple"];
        let mut vectorizer = TfidfVectorizer::new((1, 1), Some(2)).unwrap();
        vectorizer.fit(&docs).unwrap();

        // apple (4) and banana (2) survive the cap, cherry (1) does not
        assert_eq!(vectorizer.vocabulary_size(), 2);
        assert_eq!(vectorizer.term_index("apple"), Some(0));
        assert_eq!(vectorizer.term_index("banana"), Some(1));
        assert_eq!(vectorizer.term_index("cherry"), None);
    }

    #[test]
    fn test_smoothed_idf() {
        let docs = ["red blue", "red green"];
        let mut vectorizer = TfidfVectorizer::new((1, 1), None).unwrap();
        vectorizer.fit(&docs).unwrap();

        let red = vectorizer.term_index("red").unwrap();
        let blue = vectorizer.term_index("blue").unwrap();
        assert!((vectorizer.idf[red] - 1.0).abs() < 1e-12);
        assert!((vectorizer.idf[blue] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let docs = ["happy happy joy", "angry furious", "calm"];
        let mut vectorizer = TfidfVectorizer::new((1, 2), None).unwrap();
        let rows = vectorizer.fit_transform(&docs).unwrap();

        for row in &rows {
            let norm: f64 = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
            assert!(row.windows(2).all(|w| w[0].0 < w[1].0));
        }

        // Unknown words produce an empty row
        let unseen = vectorizer.transform(&["zebra xylophone"]);
        assert!(unseen[0].is_empty());
    }

    #[test]
    fn test_empty_vocabulary_is_an_error() {
        let mut vectorizer = TfidfVectorizer::new((1, 2), None).unwrap();
        assert!(vectorizer.fit(&["a b c", "!"]).is_err());
        assert!(vectorizer.fit(&Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_serde_preserves_transform() {
        let docs = ["the meeting went well", "this makes me furious"];
        let mut vectorizer = TfidfVectorizer::new((1, 2), Some(10)).unwrap();
        vectorizer.fit(&docs).unwrap();

        let json = serde_json::to_string(&vectorizer).unwrap();
        let restored: TfidfVectorizer = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.vocabulary_size(), vectorizer.vocabulary_size());
        assert_eq!(restored.transform(&docs), vectorizer.transform(&docs));
    }
}
