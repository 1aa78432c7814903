use tokio::sync::{
    broadcast,
    mpsc::{UnboundedReceiver, UnboundedSender},
};

use crate::termination::Interrupted;

use super::action::ComponentAction;

/// The focused-chart state store.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ComponentState {
    state_tx: UnboundedSender<ActiveComponent>,
}

impl ComponentState {
    /// create a new component state store, and return the receiver for listening to state updates.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<ActiveComponent>) {
        let (state_tx, state_rx) = tokio::sync::mpsc::unbounded_channel::<ActiveComponent>();

        (Self { state_tx }, state_rx)
    }

    /// a loop that updates the active component when requested
    ///
    /// # Errors
    ///
    /// Fails if the state cannot be sent
    pub async fn main_loop(
        &self,
        mut action_rx: UnboundedReceiver<ComponentAction>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut state = ActiveComponent::default();

        // the initial state once
        self.state_tx.send(state)?;

        let result = loop {
            tokio::select! {
                // Handle the actions coming from the UI
                Some(action) = action_rx.recv() => {
                    state = Self::handle_action(state, action);
                    self.state_tx.send(state)?;
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                }
            }
        };

        Ok(result)
    }

    /// Handles the action, returning the new state.
    #[must_use]
    const fn handle_action(state: ActiveComponent, action: ComponentAction) -> ActiveComponent {
        match action {
            ComponentAction::Next => state.next(),
            ComponentAction::Previous => state.prev(),
            ComponentAction::Set(new_state) => new_state,
        }
    }
}

/// Which chart keyboard input goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::module_name_repetitions)]
pub enum ActiveComponent {
    #[default]
    BarChart,
    StreamChart,
    Heatmap,
}

impl ActiveComponent {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::BarChart => Self::StreamChart,
            Self::StreamChart => Self::Heatmap,
            Self::Heatmap => Self::BarChart,
        }
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::BarChart => Self::Heatmap,
            Self::StreamChart => Self::BarChart,
            Self::Heatmap => Self::StreamChart,
        }
    }
}
