//! A load-once, multi-subscriber cache of datasets keyed by source path.
//!
//! Every chart asks the cache for the dataset it draws, so the file is parsed
//! once, and every chart sees the same snapshot.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::{Mutex, OnceCell};

use crate::errors::DatasetError;

use super::Dataset;

#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, Arc<OnceCell<Arc<Dataset>>>>>,
}

impl DatasetCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the dataset at `path`, loading it if no one has yet.
    ///
    /// Concurrent callers for the same path wait on the same load.
    /// A failed load is not cached, the next caller tries again.
    ///
    /// # Errors
    ///
    /// Fails if the dataset can't be loaded, see [`Dataset::load`].
    pub async fn get(&self, path: impl AsRef<Path>) -> Result<Arc<Dataset>, DatasetError> {
        let path = path.as_ref().to_path_buf();
        let cell = self
            .entries
            .lock()
            .await
            .entry(path.clone())
            .or_default()
            .clone();

        cell.get_or_try_init(|| async move {
            let dataset = tokio::task::spawn_blocking(move || Dataset::load(&path)).await??;
            Ok::<_, DatasetError>(Arc::new(dataset))
        })
        .await
        .cloned()
    }

    /// Whether the dataset at `path` has been loaded.
    pub async fn is_loaded(&self, path: impl AsRef<Path>) -> bool {
        self.entries
            .lock()
            .await
            .get(path.as_ref())
            .is_some_and(|cell| cell.initialized())
    }
}
