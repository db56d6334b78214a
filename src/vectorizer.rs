use std::collections::BTreeSet;
use std::error::Error;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tokens are lowercased runs of two or more word characters.
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

fn token_pattern() -> Regex {
    Regex::new(TOKEN_PATTERN).unwrap()
}

/// Bag-of-words vectorizer.
/// Fitting builds a sorted vocabulary over the distinct tokens of the
/// input documents; transforming counts vocabulary tokens per document.
/// The token pattern is a compile-time constant and is not serialized.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountVectorizer {
    vocabulary: Vec<String>,
    #[serde(skip, default = "token_pattern")]
    pattern: Regex,
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountVectorizer {
    /// Creates a new, unfitted instance of [`CountVectorizer`].
    pub fn new() -> Self {
        CountVectorizer {
            vocabulary: vec![],
            pattern: token_pattern(),
        }
    }

    /// Splits a document into lowercased tokens.
    fn tokenize(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Fits the vocabulary from the given documents.
    /// The vocabulary is the sorted list of distinct tokens; any
    /// previously fitted vocabulary is discarded.
    ///
    /// # Arguments
    /// * `documents` - The documents to build the vocabulary from.
    ///
    /// # Errors
    /// Returns an error if no document yields any token.
    pub fn fit(&mut self, documents: &[String]) -> Result<(), Box<dyn Error>> {
        let mut tokens = BTreeSet::new();
        for document in documents {
            for token in self.tokenize(document) {
                tokens.insert(token);
            }
        }

        if tokens.is_empty() {
            return Err("empty vocabulary: no document contains a usable token".into());
        }

        self.vocabulary = tokens.into_iter().collect();
        Ok(())
    }

    /// Transforms a single document into a dense count vector over the
    /// fitted vocabulary. Tokens outside the vocabulary are ignored.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut counts = vec![0.0; self.vocabulary.len()];
        for token in self.tokenize(document) {
            if let Ok(pos) = self.vocabulary.binary_search(&token) {
                counts[pos] += 1.0;
            }
        }
        counts
    }

    /// Fits the vocabulary and transforms every document in one pass.
    ///
    /// # Errors
    /// Returns an error if fitting fails.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
        self.fit(documents)?;
        Ok(documents.iter().map(|d| self.transform(d)).collect())
    }

    /// Returns the fitted vocabulary.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Returns the number of features (vocabulary size).
    pub fn num_features(&self) -> usize {
        self.vocabulary.len()
    }
}
