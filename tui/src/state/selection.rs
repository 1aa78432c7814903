//! The selected-artist state store.
//!
//! The bar chart writes the selection, the bar chart (for highlighting) and the stream chart (for
//! filtering) read it.

use log::debug;
use tokio::sync::{
    broadcast,
    mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};
use trackdash_core::state::ArtistSelection;

use crate::termination::Interrupted;

use super::action::SelectionAction;

#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct SelectionState {
    state_tx: UnboundedSender<Option<String>>,
}

impl SelectionState {
    /// create a new selection store, and return the receiver for listening to state updates.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<Option<String>>) {
        let (state_tx, state_rx) = unbounded_channel();

        (Self { state_tx }, state_rx)
    }

    /// a loop that applies selection actions, sending the selection after each one that changes it.
    ///
    /// # Errors
    ///
    /// Fails if the state cannot be sent
    pub async fn main_loop(
        &self,
        mut action_rx: UnboundedReceiver<SelectionAction>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut state = ArtistSelection::default();

        // the initial state once
        self.state_tx.send(state.get().map(ToString::to_string))?;

        let result = loop {
            tokio::select! {
                Some(action) = action_rx.recv() => {
                    let before = state.clone();
                    handle_action(&mut state, action);
                    if state != before {
                        debug!("selected artist: {:?}", state.get());
                        self.state_tx.send(state.get().map(ToString::to_string))?;
                    }
                },
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                }
            }
        };

        Ok(result)
    }
}

fn handle_action(state: &mut ArtistSelection, action: SelectionAction) {
    match action {
        SelectionAction::Toggle(artist) => state.toggle(&artist),
        SelectionAction::Clear => state.clear(),
    }
}
