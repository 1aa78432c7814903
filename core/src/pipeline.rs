//! Per-chart assembly: raw rows in, chart-ready aggregates out.
//!
//! Every chart normalizes the rows it needs on its own, so a row that is only bad for one chart
//! still shows up in the others.

use log::debug;

use crate::{
    aggregate::{
        ArtistSummary, DurationTable, PopularityGrid, by_artist, duration_table, genre_counts,
        popularity_grid,
    },
    config::{BarChartSettings, HeatmapSettings},
    dataset::RawRecord,
    select::{top_artists, top_genres},
    track::{ArtistTrack, DurationTrack, FromRaw, Normalized, TimelineTrack, normalize},
};

fn normalize_for<'a, T: FromRaw>(
    chart: &str,
    rows: impl IntoIterator<Item = &'a RawRecord>,
) -> Vec<T> {
    let Normalized { records, rejected } = normalize::<T>(rows);
    if !rejected.is_empty() {
        debug!("{chart}: dropped {} rows", rejected.len());
        if let Some((row, reason)) = rejected.first() {
            debug!("{chart}: first dropped row is #{row} ({reason})");
        }
    }
    records
}

/// The bar chart's artists: most popular first, filtered by minimum support, truncated.
#[must_use]
pub fn bar_chart_data(rows: &[RawRecord], settings: BarChartSettings) -> Vec<ArtistSummary> {
    let tracks: Vec<ArtistTrack> = normalize_for("bar chart", rows);
    top_artists(&by_artist(&tracks), settings.min_track_count, settings.top_n)
}

/// The stream chart's tracks, normalized once so a selection change only has to refilter.
#[must_use]
pub fn stream_chart_tracks(rows: &[RawRecord]) -> Vec<DurationTrack> {
    normalize_for("stream chart", rows)
}

/// The stream chart's table, only counting `selected`'s tracks if there is a selection.
#[must_use]
pub fn stream_chart_data(tracks: &[DurationTrack], selected: Option<&str>) -> DurationTable {
    match selected {
        Some(artist) => duration_table(tracks.iter().filter(|track| track.is_by(artist))),
        None => duration_table(tracks),
    }
}

/// The heatmap's grid over the genres with the most tracks.
#[must_use]
pub fn heatmap_data(rows: &[RawRecord], settings: HeatmapSettings) -> PopularityGrid {
    let tracks: Vec<TimelineTrack> = normalize_for("heatmap", rows);
    let genres = top_genres(&genre_counts(&tracks), settings.genre_count);
    popularity_grid(&tracks, &genres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        aggregate::{DurationBucket, PopularityBand},
        dataset::Dataset,
        test_utils::{SAMPLE_CSV, track_row},
    };
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dataset() -> Dataset {
        Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap()
    }

    fn bar_settings(min_track_count: usize) -> BarChartSettings {
        BarChartSettings {
            top_n: 10,
            min_track_count,
        }
    }

    #[rstest]
    fn test_bar_chart_data(dataset: Dataset) {
        let summaries = bar_chart_data(&dataset.rows, bar_settings(2));
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].artist, "Alpha");
        assert!((summaries[0].avg_popularity - 85.0).abs() < 1e-9);
        assert_eq!(summaries[0].primary_genre, "pop");
        assert_eq!(summaries[0].track_count, 2);

        assert_eq!(
            bar_chart_data(&dataset.rows, bar_settings(1))
                .iter()
                .map(|s| s.artist.as_str())
                .collect::<Vec<_>>(),
            vec!["Alpha", "Beta", "Gamma"]
        );
    }

    #[rstest]
    fn test_default_support_empties_a_small_dataset(dataset: Dataset) {
        assert!(bar_chart_data(&dataset.rows, BarChartSettings::default()).is_empty());
    }

    #[rstest]
    fn test_stream_chart_drops_long_tracks(dataset: Dataset) {
        let tracks = stream_chart_tracks(&dataset.rows);
        // Gamma's 20 minute track is out of range
        assert_eq!(tracks.len(), 3);
        assert!(!tracks.iter().any(|track| track.is_by("Gamma")));
    }

    #[rstest]
    fn test_stream_chart_refilters_by_selection(dataset: Dataset) {
        let tracks = stream_chart_tracks(&dataset.rows);

        let all = stream_chart_data(&tracks, None);
        assert_eq!(all.total(), 3);

        let alpha = stream_chart_data(&tracks, Some("Alpha"));
        assert_eq!(alpha.total(), 2);
        assert_eq!(alpha.row(DurationBucket::UnderTwo).count(PopularityBand::High), 1);
        assert_eq!(alpha.row(DurationBucket::ThreeToFour).count(PopularityBand::High), 1);

        assert!(stream_chart_data(&tracks, Some("alpha")).is_empty());
        assert!(stream_chart_data(&tracks, Some("Nobody")).is_empty());
    }

    #[rstest]
    fn test_heatmap_data(dataset: Dataset) {
        let grid = heatmap_data(
            &dataset.rows,
            HeatmapSettings {
                genre_count: 1,
                ..HeatmapSettings::default()
            },
        );
        // 1999 is in range, so every row counts
        assert_eq!(grid.years, vec![1999, 2000, 2001, 2003]);
        // pop and rock both have two tracks, pop was seen first
        assert_eq!(grid.genres, vec!["pop"]);
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn test_empty_rows() {
        assert!(bar_chart_data(&[], bar_settings(1)).is_empty());
        assert!(stream_chart_data(&stream_chart_tracks(&[]), None).is_empty());
        assert!(heatmap_data(&[], HeatmapSettings::default()).is_empty());
    }

    #[test]
    fn test_rows_without_an_artist_only_count_without_a_selection() {
        let rows = vec![
            track_row("", "pop", "50", "3.0", "2000"),
            track_row("Alpha", "pop", "50", "3.0", "2000"),
        ];
        let tracks = stream_chart_tracks(&rows);
        assert_eq!(stream_chart_data(&tracks, None).total(), 2);
        assert_eq!(stream_chart_data(&tracks, Some("Alpha")).total(), 1);
        // but the bar chart needs the artist
        assert_eq!(bar_chart_data(&rows, bar_settings(1)).len(), 1);
    }
}
