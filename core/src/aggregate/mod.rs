//! Group-by + reduce over normalized track records.
//!
//! Every aggregation orders its keys by their declared domain (ascending year, fixed bucket
//! and band order), or first-seen order where there is no natural order, never by hash order,
//! so chart axes are stable across reloads.

pub mod artist;
pub mod duration;
pub mod grid;

pub use artist::{ArtistSummary, by_artist};
pub use duration::{DurationBucket, DurationRow, DurationTable, PopularityBand, duration_table};
pub use grid::{GridCell, PopularityGrid, genre_counts, popularity_grid};

/// Arithmetic mean of a non-empty group.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(sum: f64, count: usize) -> f64 {
    debug_assert!(count > 0, "mean of an empty group");
    sum / count as f64
}
