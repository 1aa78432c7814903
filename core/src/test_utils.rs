//! Shared fixtures for the unit tests.

use crate::dataset::RawRecord;

pub const SAMPLE_CSV: &str = r#"artist_name,artist_genres,artist_popularity,track_popularity,track_duration_min,album_release_date
Alpha,"['pop', 'dance pop']",81,80,3.5,2001-05-03
Alpha,"['pop', 'dance pop']",81,90,1.9,2003
Beta,"[""rock"",""hard rock""]",64,72.5,4.2,2000-01-01
Gamma,"rock, indie",40,55,20,1999-12-31
"#;

/// Build a raw record from `(column, value)` pairs.
pub fn row(fields: &[(&str, &str)]) -> RawRecord {
    fields.iter().copied().collect()
}

/// A row with every column the charts look at.
pub fn track_row(
    artist: &str,
    genres: &str,
    popularity: &str,
    duration: &str,
    release_date: &str,
) -> RawRecord {
    row(&[
        ("artist_name", artist),
        ("artist_genres", genres),
        ("artist_popularity", "50"),
        ("track_popularity", popularity),
        ("track_duration_min", duration),
        ("album_release_date", release_date),
    ])
}
