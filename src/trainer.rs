use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bayes::MultinomialNb;
use crate::vectorizer::CountVectorizer;

/// Evaluation result of one training run.
#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
}

#[derive(Serialize)]
struct SavedModelRef<'a> {
    vectorizer: &'a CountVectorizer,
    model: &'a MultinomialNb,
}

#[derive(Deserialize)]
struct SavedModel {
    vectorizer: CountVectorizer,
    model: MultinomialNb,
}

/// Collapses a label set into its composite target string.
fn composite(labels: &[String]) -> String {
    labels.join(", ")
}

/// Splits row indices into shuffled train and test partitions.
/// The shuffle is driven by a seeded RNG so the same seed always
/// produces the same partition. The test partition takes
/// `ceil(num_rows * test_size)` indices.
///
/// # Errors
/// Returns an error if either partition would be empty.
pub fn train_test_split(
    num_rows: usize,
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), Box<dyn Error>> {
    let num_test = (num_rows as f64 * test_size).ceil() as usize;
    if num_test == 0 || num_test >= num_rows {
        return Err(format!(
            "cannot split {} records into train/test with test size {}",
            num_rows, test_size
        )
        .into());
    }

    let mut indices: Vec<usize> = (0..num_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(num_test);
    Ok((train, indices))
}

/// Trainer struct for managing the labeling pipeline.
/// It owns the vectorizer and the Naive Bayes model, fits both from a
/// dataset, evaluates accuracy on a held-out partition, answers label
/// queries, and saves or loads the fitted pair.
pub struct Trainer {
    vectorizer: CountVectorizer,
    model: MultinomialNb,
    test_size: f64,
    seed: u64,
}

impl Trainer {
    /// Creates a new instance of [`Trainer`].
    ///
    /// # Arguments
    /// * `test_size` - The fraction of records held out for evaluation.
    /// * `seed` - The RNG seed for the train/test shuffle.
    /// * `alpha` - The Laplace smoothing amount for the classifier.
    ///
    /// # Returns
    /// Returns a new instance of `Trainer` with nothing fitted yet.
    pub fn new(test_size: f64, seed: u64, alpha: f64) -> Self {
        Trainer {
            vectorizer: CountVectorizer::new(),
            model: MultinomialNb::new(alpha),
            test_size,
            seed,
        }
    }

    /// Fits the vectorizer and the classifier from the dataset and
    /// evaluates on a held-out partition.
    /// The vocabulary is built over all items; the classifier is fit on
    /// the training partition only, with each example's label set
    /// collapsed into one composite target string.
    ///
    /// # Arguments
    /// * `items` - All item strings, in dataset order.
    /// * `labels` - The label set of each item, parallel to `items`.
    ///
    /// # Returns
    /// Returns the held-out [`Metrics`].
    ///
    /// # Errors
    /// Returns an error if the vocabulary is empty, the dataset is too
    /// small to split, or fitting fails.
    pub fn fit(
        &mut self,
        items: &[String],
        labels: &[Vec<String>],
    ) -> Result<Metrics, Box<dyn Error>> {
        let matrix = self.vectorizer.fit_transform(items)?;
        let targets: Vec<String> = labels.iter().map(|l| composite(l)).collect();

        let (train, test) = train_test_split(items.len(), self.test_size, self.seed)?;
        eprintln!(
            "training on {} records, holding out {}",
            train.len(),
            test.len()
        );

        let train_rows: Vec<Vec<f64>> = train.iter().map(|&i| matrix[i].clone()).collect();
        let train_targets: Vec<String> = train.iter().map(|&i| targets[i].clone()).collect();
        self.model.fit(&train_rows, &train_targets)?;

        // Score the held-out rows in parallel; an exact composite-string
        // match counts as correct.
        let correct = test
            .par_iter()
            .filter(|&&i| {
                self.model
                    .predict(&matrix[i])
                    .map(|p| p == targets[i])
                    .unwrap_or(false)
            })
            .count();

        Ok(Metrics {
            accuracy: correct as f64 / test.len() as f64,
            correct,
            total: test.len(),
        })
    }

    /// Refits the vectorizer and the classifier on the full dataset
    /// with no held-out partition. This is the feedback path: after a
    /// corrected row is appended in memory, the vocabulary and the
    /// model are rebuilt from scratch over everything.
    ///
    /// # Errors
    /// Returns an error if fitting fails.
    pub fn refit(
        &mut self,
        items: &[String],
        labels: &[Vec<String>],
    ) -> Result<(), Box<dyn Error>> {
        let matrix = self.vectorizer.fit_transform(items)?;
        let targets: Vec<String> = labels.iter().map(|l| composite(l)).collect();
        self.model.fit(&matrix, &targets)
    }

    /// Returns the display string of an item's labels.
    /// An item already present in the dataset answers with the labels
    /// of its first occurrence, concatenated with no separator. Anything
    /// else is vectorized and classified, and the predicted composite
    /// string is returned with its whitespace stripped, again with no
    /// separator between the pieces.
    ///
    /// # Arguments
    /// * `item` - The query item string.
    /// * `items` - All item strings, in dataset order.
    /// * `labels` - The label set of each item, parallel to `items`.
    ///
    /// # Errors
    /// Returns an error if the item is unknown and the classifier has
    /// not been fitted.
    pub fn predict_labels(
        &self,
        item: &str,
        items: &[String],
        labels: &[Vec<String>],
    ) -> Result<String, Box<dyn Error>> {
        if let Some(index) = items.iter().position(|known| known == item) {
            return Ok(labels[index].concat());
        }

        let row = self.vectorizer.transform(item);
        let prediction = self.model.predict(&row)?;
        Ok(prediction.split_whitespace().collect::<String>())
    }

    /// Saves the fitted vectorizer and model to a JSON file.
    ///
    /// # Arguments
    /// * `model_path` - The path to the model file to write.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or serialized.
    pub fn save_model(&self, model_path: &Path) -> Result<(), Box<dyn Error>> {
        let file = File::create(model_path)?;
        let saved = SavedModelRef {
            vectorizer: &self.vectorizer,
            model: &self.model,
        };
        serde_json::to_writer(BufWriter::new(file), &saved)?;
        Ok(())
    }

    /// Loads a fitted vectorizer and model from a JSON file, replacing
    /// whatever this trainer currently holds.
    ///
    /// # Arguments
    /// * `model_path` - The path to the model file to load.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or parsed.
    pub fn load_model(&mut self, model_path: &Path) -> Result<(), Box<dyn Error>> {
        let file = File::open(model_path)?;
        let saved: SavedModel = serde_json::from_reader(BufReader::new(file))?;
        self.vectorizer = saved.vectorizer;
        self.model = saved.model;
        Ok(())
    }
}
