//! Genre fields in the source data are stringified lists in one of several shapes:
//! `['pop', 'dance pop']`, `["pop","dance pop"]`, or just `pop, dance pop`.

/// The label used when a track has no usable genre.
pub const UNKNOWN_GENRE: &str = "Unknown";

const LIST_DELIMITERS: [char; 4] = ['[', ']', '\'', '"'];

/// Every genre label in a raw genre field, in order, with list punctuation removed.
#[must_use]
pub fn extract_genres(raw: &str) -> Vec<String> {
    raw.replace(LIST_DELIMITERS, "")
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// The primary (first) genre of a raw genre field, or [`UNKNOWN_GENRE`].
///
/// Never returns an empty string.
#[must_use]
pub fn extract_primary_genre(raw: Option<&str>) -> String {
    raw.and_then(|raw| extract_genres(raw).into_iter().next())
        .unwrap_or_else(|| UNKNOWN_GENRE.to_string())
}
