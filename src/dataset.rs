use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// An in-memory copy of the labeled dataset file.
/// Items and labels are parallel vectors in file order; categories
/// holds every distinct label in first-seen order.
#[derive(Debug, Default)]
pub struct Dataset {
    pub items: Vec<String>,
    pub labels: Vec<Vec<String>>,
    pub categories: Vec<String>,
}

impl Dataset {
    /// Loads a dataset from a file.
    /// Each line is one record: the item, then zero or more labels,
    /// all comma-separated. A line without commas yields an item with
    /// no labels. Empty lines are skipped. Fields are not trimmed.
    ///
    /// # Arguments
    /// * `path` - The path to the dataset file.
    ///
    /// # Returns
    /// Returns the loaded [`Dataset`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or read.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut dataset = Dataset::default();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split(',');
            // split always yields at least one field
            let item = fields.next().unwrap_or_default().to_string();
            let row_labels: Vec<String> = fields.map(|s| s.to_string()).collect();

            for label in &row_labels {
                if !dataset.categories.contains(label) {
                    dataset.categories.push(label.clone());
                }
            }

            dataset.items.push(item);
            dataset.labels.push(row_labels);
        }

        Ok(dataset)
    }

    /// Appends a record to the in-memory dataset without touching the file.
    pub fn push(&mut self, item: String, labels: Vec<String>) {
        for label in &labels {
            if !self.categories.contains(label) {
                self.categories.push(label.clone());
            }
        }
        self.items.push(item);
        self.labels.push(labels);
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Appends one record to the dataset file, creating it if necessary.
/// The record is written as `item,label1,label2,...` on its own line.
///
/// # Arguments
/// * `path` - The path to the dataset file.
/// * `item` - The item string.
/// * `labels` - The labels to write after the item.
///
/// # Errors
/// Returns an error if the file cannot be opened or written to.
pub fn append_record(path: &Path, item: &str, labels: &[String]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{},{}", item, labels.join(","))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    #[test]
    fn test_load() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "apple,fruit,red")?;
        writeln!(file, "banana,fruit,yellow")?;
        file.as_file().sync_all()?;

        let dataset = Dataset::load(file.path())?;

        assert_eq!(dataset.items, vec!["apple", "banana"]);
        assert_eq!(
            dataset.labels,
            vec![vec!["fruit", "red"], vec!["fruit", "yellow"]]
        );
        // Distinct labels in first-seen order.
        assert_eq!(dataset.categories, vec!["fruit", "red", "yellow"]);
        Ok(())
    }

    #[test]
    fn test_load_line_without_labels() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "kiwi")?;
        file.as_file().sync_all()?;

        let dataset = Dataset::load(file.path())?;

        // A line with no commas is an item with zero labels, not an error.
        assert_eq!(dataset.items, vec!["kiwi"]);
        assert_eq!(dataset.labels, vec![Vec::<String>::new()]);
        assert!(dataset.categories.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_skips_empty_lines() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "apple,fruit")?;
        writeln!(file)?;
        writeln!(file, "banana,fruit")?;
        file.as_file().sync_all()?;

        let dataset = Dataset::load(file.path())?;

        assert_eq!(dataset.len(), 2);
        Ok(())
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Dataset::load(Path::new("no-such-dataset-file.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_fields_are_not_trimmed() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "pea, veg,green")?;
        file.as_file().sync_all()?;

        let dataset = Dataset::load(file.path())?;

        // Leading spaces inside fields are preserved.
        assert_eq!(dataset.labels[0], vec![" veg", "green"]);
        Ok(())
    }

    #[test]
    fn test_append_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "apple,fruit,red")?;
        file.as_file().sync_all()?;

        let labels = vec!["veg".to_string(), "green".to_string()];
        append_record(file.path(), "pea", &labels)?;

        // The appended row reloads as the last record, labels in order.
        let dataset = Dataset::load(file.path())?;
        assert_eq!(dataset.items.last().unwrap(), "pea");
        assert_eq!(dataset.labels.last().unwrap(), &labels);
        Ok(())
    }

    #[test]
    fn test_duplicate_items_are_kept() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "apple,fruit")?;
        writeln!(file, "apple,red")?;
        file.as_file().sync_all()?;

        let dataset = Dataset::load(file.path())?;

        assert_eq!(dataset.items, vec!["apple", "apple"]);
        assert_eq!(dataset.labels, vec![vec!["fruit"], vec!["red"]]);
        Ok(())
    }
}
