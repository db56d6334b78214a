use std::collections::BTreeMap;
use std::error::Error;

use serde::{Deserialize, Serialize};

/// Multinomial Naive Bayes classifier over dense count vectors.
/// Targets are plain strings; multi-label rows are expected to arrive
/// already collapsed into one composite string per example. Classes are
/// kept in sorted order and ties resolve to the first class.
#[derive(Debug, Serialize, Deserialize)]
pub struct MultinomialNb {
    pub alpha: f64,
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    /// Creates a new, unfitted instance of [`MultinomialNb`].
    ///
    /// # Arguments
    /// * `alpha` - The Laplace smoothing amount added to every feature count.
    pub fn new(alpha: f64) -> Self {
        MultinomialNb {
            alpha,
            classes: vec![],
            class_log_prior: vec![],
            feature_log_prob: vec![],
        }
    }

    /// Fits the classifier on count vectors and their target strings.
    /// Any previously fitted parameters are discarded.
    ///
    /// # Arguments
    /// * `rows` - One count vector per training example.
    /// * `targets` - The target string of each example, parallel to `rows`.
    ///
    /// # Errors
    /// Returns an error if the training set is empty or if the two
    /// slices differ in length.
    pub fn fit(&mut self, rows: &[Vec<f64>], targets: &[String]) -> Result<(), Box<dyn Error>> {
        if rows.is_empty() {
            return Err("cannot fit on an empty training set".into());
        }
        if rows.len() != targets.len() {
            return Err(format!(
                "training set size mismatch: {} rows, {} targets",
                rows.len(),
                targets.len()
            )
            .into());
        }

        let num_features = rows[0].len();

        // Sorted class order keeps fitting deterministic.
        let mut by_class: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, target) in targets.iter().enumerate() {
            by_class.entry(target.as_str()).or_default().push(i);
        }

        let num_examples = rows.len() as f64;
        self.classes = Vec::with_capacity(by_class.len());
        self.class_log_prior = Vec::with_capacity(by_class.len());
        self.feature_log_prob = Vec::with_capacity(by_class.len());

        for (class, indices) in by_class {
            let mut feature_counts = vec![0.0f64; num_features];
            for &i in &indices {
                for (f, &count) in rows[i].iter().enumerate() {
                    feature_counts[f] += count;
                }
            }

            let total: f64 =
                feature_counts.iter().sum::<f64>() + self.alpha * num_features as f64;
            let log_prob = feature_counts
                .iter()
                .map(|&c| ((c + self.alpha) / total).ln())
                .collect();

            self.classes.push(class.to_string());
            self.class_log_prior
                .push((indices.len() as f64 / num_examples).ln());
            self.feature_log_prob.push(log_prob);
        }

        Ok(())
    }

    /// Predicts the target string for one count vector.
    /// The prediction is always one of the trained classes; inputs whose
    /// true class was never seen in training are simply mispredicted.
    ///
    /// # Errors
    /// Returns an error if the classifier has not been fitted.
    pub fn predict(&self, row: &[f64]) -> Result<String, Box<dyn Error>> {
        if self.classes.is_empty() {
            return Err("classifier has not been fitted".into());
        }

        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (c, log_prob) in self.feature_log_prob.iter().enumerate() {
            let mut score = self.class_log_prior[c];
            for (f, &count) in row.iter().enumerate() {
                if count != 0.0 {
                    score += count * log_prob[f];
                }
            }
            if score > best_score {
                best = c;
                best_score = score;
            }
        }

        Ok(self.classes[best].clone())
    }

    /// Returns the trained classes in sorted order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}
