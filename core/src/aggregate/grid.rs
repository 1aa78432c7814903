//! The dense (year, genre) grid behind the heatmap.

use std::collections::{BTreeSet, HashMap};

use crate::track::TimelineTrack;

use super::mean;

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub year: u16,
    pub genre: String,
    /// `None` when no track has this (year, genre).
    pub avg_popularity: Option<f64>,
}

/// Mean popularity for every (observed year, selected genre) pair.
///
/// Always has `years.len() * genres.len()` cells, ordered by year then by genre.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopularityGrid {
    /// Every year with at least one track, ascending.
    pub years: Vec<u16>,
    pub genres: Vec<String>,
    pub cells: Vec<GridCell>,
}

impl PopularityGrid {
    #[must_use]
    pub fn get(&self, year: u16, genre: &str) -> Option<&GridCell> {
        let row = self.years.binary_search(&year).ok()?;
        let column = self.genres.iter().position(|g| g == genre)?;
        self.cells.get(row * self.genres.len() + column)
    }

    /// The observed `(min, max)` average popularity, `None` if no cell has a value.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .filter_map(|cell| cell.avg_popularity)
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// How many tracks each genre has, in the order genres are first seen.
#[must_use]
pub fn genre_counts(tracks: &[TimelineTrack]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for track in tracks {
        if let Some(&i) = index.get(track.genre.as_str()) {
            counts[i].1 += 1;
        } else {
            index.insert(track.genre.as_str(), counts.len());
            counts.push((track.genre.clone(), 1));
        }
    }
    counts
}

/// Build the dense grid of observed years × `genres`.
///
/// Tracks of genres not in `genres` still contribute their year to the year axis.
#[must_use]
pub fn popularity_grid(tracks: &[TimelineTrack], genres: &[String]) -> PopularityGrid {
    let mut selected: Vec<String> = Vec::with_capacity(genres.len());
    for genre in genres {
        if !selected.contains(genre) {
            selected.push(genre.clone());
        }
    }

    let years: Vec<u16> = tracks
        .iter()
        .map(|track| track.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut sums: HashMap<(u16, &str), (f64, usize)> = HashMap::new();
    for track in tracks {
        if selected.contains(&track.genre) {
            let (sum, count) = sums.entry((track.year, track.genre.as_str())).or_default();
            *sum += track.popularity;
            *count += 1;
        }
    }

    let cells = years
        .iter()
        .flat_map(|&year| {
            let sums = &sums;
            selected.iter().map(move |genre| GridCell {
                year,
                genre: genre.clone(),
                avg_popularity: sums
                    .get(&(year, genre.as_str()))
                    .map(|&(sum, count)| mean(sum, count)),
            })
        })
        .collect();

    PopularityGrid {
        years,
        genres: selected,
        cells,
    }
}
