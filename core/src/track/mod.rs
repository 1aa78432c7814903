//! Turns raw rows into typed, validated track records.
//!
//! Each chart only needs some of a row's fields, so there is one record type per chart,
//! and a row only has to be valid for the fields that chart reads.
//! A row that fails is rejected with a [`Rejection`] saying which field failed and why.

use log::debug;
use strum::Display;
use thiserror::Error;

use crate::dataset::RawRecord;

pub mod genre;

pub use genre::{UNKNOWN_GENRE, extract_primary_genre};

/// Release years outside of `[MIN_YEAR, MAX_YEAR]` are rejected.
pub const MIN_YEAR: i32 = 1950;
pub const MAX_YEAR: i32 = 2026;
/// Durations (in minutes) must be in `(0, MAX_DURATION_MINUTES)`.
pub const MAX_DURATION_MINUTES: f64 = 15.0;

/// Source columns, primary name first, then the column to fall back to if the first is absent.
pub mod columns {
    pub const RELEASE_DATE: (&str, &str) = ("album_release_date", "release_date");
    pub const POPULARITY: (&str, &str) = ("track_popularity", "popularity");
    pub const DURATION: &str = "track_duration_min";
    pub const ARTIST: (&str, &str) = ("artist_name", "artists");
    pub const ARTIST_POPULARITY: &str = "artist_popularity";
    pub const GENRES: (&str, &str) = ("artist_genres", "genres");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Year,
    Popularity,
    DurationMinutes,
    Artist,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectReason {
    #[error("missing")]
    Missing,
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("year {0} is outside [1950, 2026]")]
    YearOutOfRange(i32),
    #[error("duration {0} is outside (0, 15)")]
    DurationOutOfRange(f64),
    #[error("empty")]
    Empty,
}

/// Why a row was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {reason}")]
pub struct Rejection {
    pub field: Field,
    pub reason: RejectReason,
}

impl Rejection {
    #[must_use]
    pub const fn new(field: Field, reason: RejectReason) -> Self {
        Self { field, reason }
    }
}

/// Parse a finite number out of a cell.
fn number(value: Option<&str>, field: Field) -> Result<f64, Rejection> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(Rejection::new(field, RejectReason::Missing))?;
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Rejection::new(field, RejectReason::NotANumber(value.to_string())))
}

/// The release year is the first four characters of the release date.
pub fn year(record: &RawRecord) -> Result<u16, Rejection> {
    let (primary, fallback) = columns::RELEASE_DATE;
    let value = record
        .get_or(primary, fallback)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(Rejection::new(Field::Year, RejectReason::Missing))?;
    let prefix: String = value.chars().take(4).collect();
    let year = prefix
        .parse::<i32>()
        .map_err(|_| Rejection::new(Field::Year, RejectReason::NotANumber(prefix.clone())))?;
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        u16::try_from(year)
            .map_err(|_| Rejection::new(Field::Year, RejectReason::YearOutOfRange(year)))
    } else {
        Err(Rejection::new(Field::Year, RejectReason::YearOutOfRange(year)))
    }
}

pub fn popularity(record: &RawRecord) -> Result<f64, Rejection> {
    let (primary, fallback) = columns::POPULARITY;
    number(record.get_or(primary, fallback), Field::Popularity)
}

pub fn duration_minutes(record: &RawRecord) -> Result<f64, Rejection> {
    let minutes = number(record.get(columns::DURATION), Field::DurationMinutes)?;
    if minutes > 0.0 && minutes < MAX_DURATION_MINUTES {
        Ok(minutes)
    } else {
        Err(Rejection::new(
            Field::DurationMinutes,
            RejectReason::DurationOutOfRange(minutes),
        ))
    }
}

pub fn artist(record: &RawRecord) -> Result<String, Rejection> {
    let (primary, fallback) = columns::ARTIST;
    match record.get_or(primary, fallback).map(str::trim) {
        None => Err(Rejection::new(Field::Artist, RejectReason::Missing)),
        Some("") => Err(Rejection::new(Field::Artist, RejectReason::Empty)),
        Some(artist) => Ok(artist.to_string()),
    }
}

/// Defaults to 0 when absent or unreadable, never rejects.
#[must_use]
pub fn artist_popularity(record: &RawRecord) -> f64 {
    number(record.get(columns::ARTIST_POPULARITY), Field::Popularity).unwrap_or(0.0)
}

#[must_use]
pub fn primary_genre(record: &RawRecord) -> String {
    let (primary, fallback) = columns::GENRES;
    extract_primary_genre(record.get_or(primary, fallback))
}

/// A record type that can be built from a raw row.
pub trait FromRaw: Sized {
    /// # Errors
    ///
    /// Fails with the first field that is invalid.
    fn from_raw(record: &RawRecord) -> Result<Self, Rejection>;
}

/// What the artist bar chart needs from a track.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistTrack {
    pub artist: String,
    pub genre: String,
    pub popularity: f64,
    pub artist_popularity: f64,
}

impl FromRaw for ArtistTrack {
    fn from_raw(record: &RawRecord) -> Result<Self, Rejection> {
        Ok(Self {
            popularity: popularity(record)?,
            artist: artist(record)?,
            genre: primary_genre(record),
            artist_popularity: artist_popularity(record),
        })
    }
}

/// What the year/genre heatmap needs from a track.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineTrack {
    pub year: u16,
    pub genre: String,
    pub popularity: f64,
}

impl FromRaw for TimelineTrack {
    fn from_raw(record: &RawRecord) -> Result<Self, Rejection> {
        Ok(Self {
            year: year(record)?,
            popularity: popularity(record)?,
            genre: primary_genre(record),
        })
    }
}

/// What the duration stream chart needs from a track.
///
/// The artist is only needed to filter by the selected artist, a row without one is still counted.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationTrack {
    pub artist: Option<String>,
    pub duration_minutes: f64,
    pub popularity: f64,
}

impl DurationTrack {
    /// Whether this track is by `artist`, exact match.
    #[must_use]
    pub fn is_by(&self, artist: &str) -> bool {
        self.artist.as_deref() == Some(artist)
    }
}

impl FromRaw for DurationTrack {
    fn from_raw(record: &RawRecord) -> Result<Self, Rejection> {
        Ok(Self {
            duration_minutes: duration_minutes(record)?,
            popularity: popularity(record)?,
            artist: artist(record).ok(),
        })
    }
}

/// The result of normalizing a batch of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    /// `(row index, reason)` for every row that was dropped.
    pub rejected: Vec<(usize, Rejection)>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Normalize every row, keeping the valid records in row order.
pub fn normalize<'a, T: FromRaw>(rows: impl IntoIterator<Item = &'a RawRecord>) -> Normalized<T> {
    let mut normalized = Normalized::default();
    for (i, row) in rows.into_iter().enumerate() {
        match T::from_raw(row) {
            Ok(record) => normalized.records.push(record),
            Err(rejection) => normalized.rejected.push((i, rejection)),
        }
    }
    debug!(
        "normalized {} rows into {}, rejected {}",
        normalized.records.len() + normalized.rejected.len(),
        std::any::type_name::<T>(),
        normalized.rejected.len()
    );
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{row, track_row};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::full_date("2001-05-03", Ok(2001))]
    #[case::year_only("1999", Ok(1999))]
    #[case::lower_bound("1950-01-01", Ok(1950))]
    #[case::upper_bound("2026-12-31", Ok(2026))]
    #[case::too_old("1949-12-31", Err(RejectReason::YearOutOfRange(1949)))]
    #[case::too_new("2027", Err(RejectReason::YearOutOfRange(2027)))]
    #[case::garbage("soon", Err(RejectReason::NotANumber("soon".into())))]
    #[case::empty("", Err(RejectReason::Missing))]
    fn test_year(#[case] date: &str, #[case] expected: Result<u16, RejectReason>) {
        let record = row(&[("album_release_date", date)]);
        assert_eq!(year(&record).map_err(|r| r.reason), expected);
    }

    #[test]
    fn test_year_falls_back_to_release_date() {
        let record = row(&[("release_date", "2010-02-02")]);
        assert_eq!(year(&record), Ok(2010));

        // the fallback only applies when the primary column is absent
        let record = row(&[("album_release_date", ""), ("release_date", "2010")]);
        assert_eq!(
            year(&record),
            Err(Rejection::new(Field::Year, RejectReason::Missing))
        );
    }

    #[rstest]
    #[case::integer("80", Ok(80.0))]
    #[case::decimal(" 72.5 ", Ok(72.5))]
    #[case::not_a_number("high", Err(RejectReason::NotANumber("high".into())))]
    #[case::nan("NaN", Err(RejectReason::NotANumber("NaN".into())))]
    #[case::infinite("inf", Err(RejectReason::NotANumber("inf".into())))]
    #[case::empty("", Err(RejectReason::Missing))]
    fn test_popularity(#[case] value: &str, #[case] expected: Result<f64, RejectReason>) {
        let record = row(&[("track_popularity", value)]);
        assert_eq!(popularity(&record).map_err(|r| r.reason), expected);
    }

    #[test]
    fn test_popularity_falls_back() {
        assert_eq!(popularity(&row(&[("popularity", "33")])), Ok(33.0));
        assert_eq!(
            popularity(&row(&[])),
            Err(Rejection::new(Field::Popularity, RejectReason::Missing))
        );
    }

    #[rstest]
    #[case::typical("3.5", Ok(3.5))]
    #[case::just_under("14.99", Ok(14.99))]
    #[case::upper_bound_is_exclusive("15", Err(RejectReason::DurationOutOfRange(15.0)))]
    #[case::too_long("20", Err(RejectReason::DurationOutOfRange(20.0)))]
    #[case::zero("0", Err(RejectReason::DurationOutOfRange(0.0)))]
    #[case::negative("-1", Err(RejectReason::DurationOutOfRange(-1.0)))]
    fn test_duration(#[case] value: &str, #[case] expected: Result<f64, RejectReason>) {
        let record = row(&[("track_duration_min", value)]);
        assert_eq!(duration_minutes(&record).map_err(|r| r.reason), expected);
    }

    #[rstest]
    #[case::primary(&[("artist_name", "Alpha"), ("artists", "Beta")], Ok("Alpha".to_string()))]
    #[case::fallback(&[("artists", "Beta")], Ok("Beta".to_string()))]
    #[case::trimmed(&[("artist_name", "  Alpha ")], Ok("Alpha".to_string()))]
    #[case::empty(&[("artist_name", ""), ("artists", "Beta")], Err(RejectReason::Empty))]
    #[case::missing(&[], Err(RejectReason::Missing))]
    fn test_artist(#[case] fields: &[(&str, &str)], #[case] expected: Result<String, RejectReason>) {
        assert_eq!(artist(&row(fields)).map_err(|r| r.reason), expected);
    }

    #[rstest]
    #[case(&[("artist_popularity", "64")], 64.0)]
    #[case(&[("artist_popularity", "")], 0.0)]
    #[case(&[("artist_popularity", "n/a")], 0.0)]
    #[case(&[], 0.0)]
    fn test_artist_popularity(#[case] fields: &[(&str, &str)], #[case] expected: f64) {
        assert!((artist_popularity(&row(fields)) - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn test_primary_genre_falls_back_to_genres() {
        assert_eq!(primary_genre(&row(&[("genres", "jazz, bebop")])), "jazz");
        assert_eq!(primary_genre(&row(&[])), UNKNOWN_GENRE);
    }

    #[test]
    fn test_artist_track() {
        let record = track_row("Alpha", "['pop', 'dance pop']", "80", "20", "1800");
        assert_eq!(
            ArtistTrack::from_raw(&record),
            Ok(ArtistTrack {
                artist: "Alpha".into(),
                genre: "pop".into(),
                popularity: 80.0,
                artist_popularity: 50.0,
            })
        );
    }

    #[test]
    fn test_timeline_track() {
        let record = track_row("", "rock", "55", "", "2003-01-01");
        assert_eq!(
            TimelineTrack::from_raw(&record),
            Ok(TimelineTrack {
                year: 2003,
                genre: "rock".into(),
                popularity: 55.0,
            })
        );
    }

    #[test]
    fn test_duration_track_keeps_rows_without_an_artist() {
        let record = track_row("", "rock", "55", "3.0", "");
        let track = DurationTrack::from_raw(&record).unwrap();
        assert_eq!(track.artist, None);
        assert!(!track.is_by(""));

        let record = track_row("Alpha", "rock", "55", "3.0", "");
        assert!(DurationTrack::from_raw(&record).unwrap().is_by("Alpha"));
    }

    #[test]
    fn test_normalize_reports_rejections() {
        let rows = vec![
            track_row("Alpha", "pop", "80", "3.0", "2001"),
            track_row("Beta", "rock", "70", "20", "2002"),
            track_row("Gamma", "rock", "x", "2.0", "2003"),
            track_row("Delta", "jazz", "60", "4.0", "2004"),
        ];

        let normalized = normalize::<DurationTrack>(&rows);

        assert_eq!(normalized.records.len(), 2);
        assert_eq!(
            normalized.rejected,
            vec![
                (
                    1,
                    Rejection::new(
                        Field::DurationMinutes,
                        RejectReason::DurationOutOfRange(20.0)
                    )
                ),
                (
                    2,
                    Rejection::new(Field::Popularity, RejectReason::NotANumber("x".into()))
                ),
            ]
        );
    }

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::new(Field::DurationMinutes, RejectReason::DurationOutOfRange(20.0));
        assert_eq!(
            rejection.to_string(),
            "duration_minutes: duration 20 is outside (0, 15)"
        );
    }
}
