use std::{path::PathBuf, sync::Arc};

use action::Action;
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use trackdash_core::dataset::{Dataset, DatasetCache};

use crate::termination::{Interrupted, Terminator};

pub mod action;
pub mod component;
pub mod dataset;
pub mod selection;

/// an all-in-one dispactcher for managing state updates.
pub struct Dispatcher {
    dataset: dataset::DatasetState,
    selection: selection::SelectionState,
    component: component::ComponentState,
}

/// a struct that centralized the receivers for all the state stores.
pub struct Receivers {
    pub dataset: UnboundedReceiver<Arc<Dataset>>,
    pub selection: UnboundedReceiver<Option<String>>,
    pub component: UnboundedReceiver<component::ActiveComponent>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> (Self, Receivers) {
        let (dataset, dataset_rx) = dataset::DatasetState::new();
        let (selection, selection_rx) = selection::SelectionState::new();
        let (component, component_rx) = component::ComponentState::new();

        let dispatcher = Self {
            dataset,
            selection,
            component,
        };
        let state_receivers = Receivers {
            dataset: dataset_rx,
            selection: selection_rx,
            component: component_rx,
        };

        (dispatcher, state_receivers)
    }

    /// Run every state store and the action dispatcher until shutdown.
    ///
    /// # Errors
    ///
    /// Fails if any of the stores fail.
    pub async fn main_loop(
        &self,
        cache: Arc<DatasetCache>,
        data_path: PathBuf,
        terminator: Terminator,
        action_rx: UnboundedReceiver<Action>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let (selection_action_tx, selection_action_rx) = mpsc::unbounded_channel();
        let (component_action_tx, component_action_rx) = mpsc::unbounded_channel();

        // run multiple tasks in parallel, and wait for all of them to finish.
        tokio::try_join!(
            // the dataset store
            self.dataset
                .main_loop(cache, data_path, interrupt_rx.resubscribe()),
            // the selection store
            self.selection
                .main_loop(selection_action_rx, interrupt_rx.resubscribe()),
            // the active component store
            self.component
                .main_loop(component_action_rx, interrupt_rx.resubscribe()),
            // the action dispatcher
            Self::action_dispatcher(
                terminator,
                action_rx,
                selection_action_tx,
                component_action_tx,
            ),
        )?;

        Ok(interrupt_rx.recv().await?)
    }

    async fn action_dispatcher(
        mut terminator: Terminator,
        mut action_rx: UnboundedReceiver<Action>,
        selection_action_tx: UnboundedSender<action::SelectionAction>,
        component_action_tx: UnboundedSender<action::ComponentAction>,
    ) -> anyhow::Result<()> {
        while let Some(action) = action_rx.recv().await {
            match action {
                Action::General(action) => match action {
                    action::GeneralAction::Exit => {
                        let _ = terminator.terminate(Interrupted::UserInt);

                        break;
                    }
                },
                Action::Selection(action) => {
                    selection_action_tx.send(action)?;
                }
                Action::ActiveComponent(action) => {
                    component_action_tx.send(action)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::termination::create_termination;
    use action::{ComponentAction, GeneralAction, SelectionAction};
    use component::ActiveComponent;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[timeout(Duration::from_secs(5))]
    #[tokio::test]
    async fn test_actions_reach_their_stores() {
        let dir = tempfile::tempdir().unwrap();
        let (terminator, interrupt_rx) = create_termination();
        let (dispatcher, mut receivers) = Dispatcher::new();
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            dispatcher
                .main_loop(
                    Arc::new(DatasetCache::new()),
                    dir.path().join("missing.csv"),
                    terminator,
                    action_rx,
                    interrupt_rx,
                )
                .await
        });

        // initial states
        assert!(receivers.dataset.recv().await.unwrap().is_empty());
        assert_eq!(receivers.selection.recv().await.unwrap(), None);
        assert_eq!(
            receivers.component.recv().await.unwrap(),
            ActiveComponent::BarChart
        );

        action_tx
            .send(Action::Selection(SelectionAction::Toggle("Alpha".into())))
            .unwrap();
        assert_eq!(
            receivers.selection.recv().await.unwrap(),
            Some("Alpha".into())
        );

        action_tx
            .send(Action::ActiveComponent(ComponentAction::Set(
                ActiveComponent::Heatmap,
            )))
            .unwrap();
        assert_eq!(
            receivers.component.recv().await.unwrap(),
            ActiveComponent::Heatmap
        );

        action_tx
            .send(Action::General(GeneralAction::Exit))
            .unwrap();
        assert_eq!(handle.await.unwrap().unwrap(), Interrupted::UserInt);
    }
}
