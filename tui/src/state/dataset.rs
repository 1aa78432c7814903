//! The dataset state store.
//!
//! Loads the source file once, through the shared cache, and hands every chart the same snapshot.

use std::{path::PathBuf, sync::Arc};

use log::{error, info};
use tokio::sync::{
    broadcast,
    mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};
use trackdash_core::dataset::{Dataset, DatasetCache};

use crate::termination::Interrupted;

#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct DatasetState {
    state_tx: UnboundedSender<Arc<Dataset>>,
}

impl DatasetState {
    /// create a new dataset store, and return the receiver for listening to state updates.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<Arc<Dataset>>) {
        let (state_tx, state_rx) = unbounded_channel();

        (Self { state_tx }, state_rx)
    }

    /// Load the dataset at `path` and send it, then wait for shutdown.
    ///
    /// A failed load is logged and sent as an empty dataset, so the charts render blank.
    /// A load that is still running when the interrupt arrives is dropped.
    ///
    /// # Errors
    ///
    /// Fails if the state cannot be sent
    pub async fn main_loop(
        &self,
        cache: Arc<DatasetCache>,
        path: PathBuf,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let dataset = tokio::select! {
            loaded = cache.get(&path) => match loaded {
                Ok(dataset) => {
                    info!("loaded {} rows from {}", dataset.len(), path.display());
                    dataset
                }
                Err(e) => {
                    error!("failed to load {}: {e}", path.display());
                    Arc::new(Dataset::default())
                }
            },
            Ok(interrupted) = interrupt_rx.recv() => return Ok(interrupted),
        };

        self.state_tx.send(dataset)?;

        Ok(interrupt_rx.recv().await?)
    }
}
