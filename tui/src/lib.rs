//! The trackdash terminal dashboard.
//!
//! State stores live in [`state`], the UI that draws them lives in [`ui`].

pub mod state;
pub mod termination;
#[cfg(test)]
mod test_utils;
pub mod ui;
