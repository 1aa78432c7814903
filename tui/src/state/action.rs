//! The actions a user can take through the UI.
//! Components send these to the dispatcher, which routes them to the state store they affect.
#![allow(clippy::module_name_repetitions)]

use super::component::ActiveComponent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// General actions
    General(GeneralAction),
    /// Actions that affect the selected artist.
    Selection(SelectionAction),
    /// Actions that change the focused chart.
    ActiveComponent(ComponentAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralAction {
    /// Exit the application.
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    /// Select the artist, or clear the selection if they're already selected.
    Toggle(String),
    /// Clear the selection.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentAction {
    /// Move to the next component
    Next,
    /// Move to the previous component
    Previous,
    /// Set the active component
    Set(ActiveComponent),
}
