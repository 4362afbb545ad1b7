//! Read-only registry of named datasets.

use std::collections::HashMap;

use crate::error::DataError;

use super::table::Dataset;

/// Identifier of the mpg dataset (fuel economy, ggplot2 sample).
pub const MPG: &str = "mpg";

/// Identifier of the midwest dataset (county demographics).
pub const MIDWEST: &str = "midwest";

/// Holds every dataset loaded at startup. Immutable once the server is
/// running; shared across requests behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    tables: HashMap<String, Dataset>,
}

impl DatasetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset under its own name.
    pub fn insert(&mut self, dataset: Dataset) {
        self.tables.insert(dataset.name().to_string(), dataset);
    }

    /// Look up a dataset by identifier.
    pub fn get(&self, name: &str) -> Result<&Dataset, DataError> {
        self.tables.get(name).ok_or_else(|| DataError::DatasetNotFound {
            name: name.to_string(),
        })
    }

    /// Registered dataset names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// (name, rows, columns) for every dataset, sorted by name.
    pub fn summaries(&self) -> Vec<(String, usize, usize)> {
        let mut out: Vec<(String, usize, usize)> = self
            .tables
            .values()
            .map(|d| (d.name().to_string(), d.rows(), d.headers().len()))
            .collect();
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;

    #[test]
    fn get_returns_registered_dataset() {
        let mut store = DatasetStore::new();
        store.insert(Dataset::from_csv(MPG, "cty,hwy\n18,29\n").unwrap());

        assert_eq!(store.get(MPG).unwrap().rows(), 1);
        assert_eq!(store.names(), vec![MPG]);
    }

    #[test]
    fn unknown_dataset_is_not_found() {
        let store = DatasetStore::new();
        assert!(matches!(
            store.get("nope"),
            Err(DataError::DatasetNotFound { .. })
        ));
    }

    #[test]
    fn summaries_report_shape() {
        let mut store = DatasetStore::new();
        store.insert(Dataset::from_csv(MPG, "cty,hwy\n18,29\n16,26\n").unwrap());
        store.insert(Dataset::from_csv(MIDWEST, "area,poptotal\n0.05,40000\n").unwrap());

        assert_eq!(
            store.summaries(),
            vec![
                (MIDWEST.to_string(), 1, 2),
                (MPG.to_string(), 2, 2),
            ]
        );
    }
}
