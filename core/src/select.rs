//! Ranking and truncation of aggregated groups.

use crate::aggregate::ArtistSummary;

/// How many genres the heatmap shows by default.
pub const TOP_GENRES: usize = 12;
/// How many artists the bar chart shows by default.
pub const TOP_ARTISTS: usize = 10;
/// Artists with fewer tracks than this are left off the bar chart by default.
pub const MIN_TRACK_COUNT: usize = 5;

/// The `n` genres with the most tracks, most first.
///
/// `counts` is expected in first-seen order, ties keep that order.
#[must_use]
pub fn top_genres(counts: &[(String, usize)], n: usize) -> Vec<String> {
    let mut ranked: Vec<&(String, usize)> = counts.iter().collect();
    // `sort_by` is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(n)
        .map(|(genre, _)| genre.clone())
        .collect()
}

/// The `n` most popular artists with at least `min_track_count` tracks, most popular first.
///
/// Ties keep the order of `summaries`.
#[must_use]
pub fn top_artists(
    summaries: &[ArtistSummary],
    min_track_count: usize,
    n: usize,
) -> Vec<ArtistSummary> {
    let mut ranked: Vec<&ArtistSummary> = summaries
        .iter()
        .filter(|summary| summary.track_count >= min_track_count)
        .collect();
    ranked.sort_by(|a, b| b.avg_popularity.total_cmp(&a.avg_popularity));
    ranked.into_iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::by_artist;
    use crate::track::ArtistTrack;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn summary(artist: &str, avg_popularity: f64, track_count: usize) -> ArtistSummary {
        ArtistSummary {
            artist: artist.into(),
            avg_popularity,
            primary_genre: "pop".into(),
            artist_popularity: 0.0,
            track_count,
        }
    }

    fn counts(counts: &[(&str, usize)]) -> Vec<(String, usize)> {
        counts.iter().map(|(g, c)| ((*g).to_string(), *c)).collect()
    }

    #[test]
    fn test_top_genres_stable() {
        let counts = counts(&[("jazz", 2), ("pop", 5), ("rock", 2), ("metal", 5), ("folk", 1)]);
        assert_eq!(top_genres(&counts, 4), vec!["pop", "metal", "jazz", "rock"]);
    }

    #[rstest]
    #[case::fewer_than_n(3, 3)]
    #[case::exactly_n(12, 12)]
    #[case::more_than_n(20, TOP_GENRES)]
    fn test_top_genres_truncates(#[case] available: usize, #[case] expected: usize) {
        let counts: Vec<(String, usize)> = (0..available).map(|i| (format!("g{i}"), i)).collect();
        assert_eq!(top_genres(&counts, TOP_GENRES).len(), expected);
    }

    #[test]
    fn test_top_artists_takes_ten_with_first_seen_ties() {
        // 15 artists, each with enough tracks; a, b and c are tied at the top
        let mut summaries: Vec<ArtistSummary> = (0..12)
            .map(|i| summary(&format!("artist {i}"), f64::from(i), 5))
            .collect();
        summaries.insert(3, summary("a", 50.0, 6));
        summaries.insert(0, summary("b", 50.0, 5));
        summaries.push(summary("c", 50.0, 9));

        let top = top_artists(&summaries, MIN_TRACK_COUNT, TOP_ARTISTS);

        assert_eq!(top.len(), 10);
        assert_eq!(
            top.iter().map(|s| s.artist.as_str()).collect::<Vec<_>>(),
            vec![
                "b", "a", "c", "artist 11", "artist 10", "artist 9", "artist 8", "artist 7",
                "artist 6", "artist 5"
            ]
        );
        assert!(
            top.windows(2)
                .all(|pair| pair[0].avg_popularity >= pair[1].avg_popularity)
        );
    }

    #[test]
    fn test_top_artists_minimum_support() {
        let summaries = vec![summary("few", 99.0, 4), summary("enough", 75.0, 5)];
        let top = top_artists(&summaries, MIN_TRACK_COUNT, TOP_ARTISTS);
        assert_eq!(top, vec![summary("enough", 75.0, 5)]);
    }

    #[test]
    fn test_support_filter_can_empty_the_chart() {
        let track = |artist: &str, popularity: f64| ArtistTrack {
            artist: artist.into(),
            genre: "pop".into(),
            popularity,
            artist_popularity: 0.0,
        };
        let tracks = vec![
            track("X", 80.0),
            track("X", 90.0),
            track("X", 70.0),
            track("Y", 60.0),
            track("Y", 65.0),
        ];

        let summaries = by_artist(&tracks);
        assert_eq!(summaries.len(), 2);
        assert!(top_artists(&summaries, 5, TOP_ARTISTS).is_empty());
        assert_eq!(top_artists(&summaries, 3, TOP_ARTISTS).len(), 1);
    }
}
