use std::collections::HashMap;

use crate::track::ArtistTrack;

use super::mean;

/// One artist's tracks, reduced.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistSummary {
    pub artist: String,
    pub avg_popularity: f64,
    /// The genre of the artist's first track.
    pub primary_genre: String,
    /// The artist popularity of the artist's first track.
    pub artist_popularity: f64,
    pub track_count: usize,
}

/// Group tracks by artist, in the order artists are first seen.
#[must_use]
pub fn by_artist(tracks: &[ArtistTrack]) -> Vec<ArtistSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    // (first track, popularity sum, track count)
    let mut groups: Vec<(&ArtistTrack, f64, usize)> = Vec::new();

    for track in tracks {
        match index.get(track.artist.as_str()) {
            Some(&i) => {
                let (_, sum, count) = &mut groups[i];
                *sum += track.popularity;
                *count += 1;
            }
            None => {
                index.insert(track.artist.as_str(), groups.len());
                groups.push((track, track.popularity, 1));
            }
        }
    }

    groups
        .into_iter()
        .map(|(first, sum, count)| ArtistSummary {
            artist: first.artist.clone(),
            avg_popularity: mean(sum, count),
            primary_genre: first.genre.clone(),
            artist_popularity: first.artist_popularity,
            track_count: count,
        })
        .collect()
}
