//! The raw dataset: untyped, string-keyed rows straight out of the CSV file.
//!
//! Nothing here knows what the columns mean, see [`crate::track`] for that.

use std::{
    collections::HashMap,
    io::Read,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::errors::DatasetError;

pub mod cache;

pub use cache::DatasetCache;

/// One row of the source file, keyed by column name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    /// Get the value of a column.
    ///
    /// Returns `None` only if the column is absent, an empty cell is `Some("")`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Get the value of `field`, falling back to `fallback` if (and only if) `field` is absent.
    #[must_use]
    pub fn get_or(&self, field: &str, fallback: &str) -> Option<&str> {
        self.get(field).or_else(|| self.get(fallback))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Every row of a source file, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    pub path: Option<PathBuf>,
    pub headers: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl Dataset {
    /// Build a dataset from rows that are already in memory.
    #[must_use]
    pub fn from_rows(rows: Vec<RawRecord>) -> Self {
        let mut headers: Vec<String> = rows
            .iter()
            .flat_map(|row| row.fields.keys().cloned())
            .collect();
        headers.sort();
        headers.dedup();
        Self {
            path: None,
            headers,
            rows,
        }
    }

    /// Parse a dataset from any reader of CSV text with a header row.
    ///
    /// Rows the CSV reader can't decode are skipped.
    ///
    /// # Errors
    ///
    /// Fails if the header row can't be read.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(ToString::to_string).collect();

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            match result {
                Ok(record) => rows.push(
                    headers
                        .iter()
                        .zip(record.iter())
                        .map(|(header, value)| (header.clone(), value))
                        .collect(),
                ),
                // header is line 1
                Err(e) => debug!("skipping unreadable row on line {}: {e}", i + 2),
            }
        }

        Ok(Self {
            path: None,
            headers,
            rows,
        })
    }

    /// Load a dataset from a CSV file.
    ///
    /// # Errors
    ///
    /// Fails if the file doesn't exist, can't be opened, or has no readable header.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        if !path.is_file() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let dataset = Self {
            path: Some(path.to_path_buf()),
            ..Self::from_reader(std::io::BufReader::new(file))?
        };
        info!(
            "loaded {} rows ({} columns) from {}",
            dataset.len(),
            dataset.headers.len(),
            path.display()
        );
        Ok(dataset)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SAMPLE_CSV, row};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_distinguishes_absent_from_empty() {
        let record = row(&[("artist_name", ""), ("artists", "Fallback")]);

        assert_eq!(record.get("artist_name"), Some(""));
        assert_eq!(record.get("missing"), None);
        // the fallback is only used when the column is absent
        assert_eq!(record.get_or("artist_name", "artists"), Some(""));
        assert_eq!(record.get_or("missing", "artists"), Some("Fallback"));
        assert_eq!(record.get_or("missing", "also_missing"), None);
    }

    #[test]
    fn test_from_reader() {
        let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(
            dataset.headers,
            vec![
                "artist_name",
                "artist_genres",
                "artist_popularity",
                "track_popularity",
                "track_duration_min",
                "album_release_date",
            ]
        );
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.rows[0].get("artist_name"), Some("Alpha"));
        assert_eq!(
            dataset.rows[0].get("artist_genres"),
            Some("['pop', 'dance pop']")
        );
        assert_eq!(dataset.rows[3].get("track_duration_min"), Some("20"));
    }

    #[test]
    fn test_short_rows_have_absent_columns() {
        let csv = "artist_name,track_popularity,track_duration_min\nAlpha,80\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rows[0].get("track_popularity"), Some("80"));
        assert_eq!(dataset.rows[0].get("track_duration_min"), None);
    }

    #[test]
    fn test_empty_file_is_an_empty_dataset() {
        let dataset = Dataset::from_reader("artist_name,track_popularity\n".as_bytes()).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.headers.len(), 2);
    }

    #[test]
    fn test_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tracks.csv");
        std::fs::write(&path, SAMPLE_CSV).unwrap();

        let dataset = Dataset::load(&path).unwrap();

        assert_eq!(dataset.path, Some(path));
        assert_eq!(dataset.len(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nope.csv");

        let result = Dataset::load(&path);

        assert!(matches!(result, Err(DatasetError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_from_rows_collects_headers() {
        let dataset = Dataset::from_rows(vec![
            row(&[("b", "1"), ("a", "2")]),
            row(&[("c", "3")]),
        ]);
        assert_eq!(dataset.headers, vec!["a", "b", "c"]);
        assert_eq!(dataset.len(), 2);
    }
}
