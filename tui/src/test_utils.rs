use std::sync::Arc;

use ratatui::{Terminal, backend::TestBackend, buffer::Buffer, layout::Rect};
use trackdash_core::dataset::{Dataset, RawRecord};

use crate::ui::AppState;

/// Setup a test terminal with the given width and height.
///
/// # Panics
///
/// Panics if the terminal cannot be created.
pub fn setup_test_terminal(width: u16, height: u16) -> (Terminal<TestBackend>, Rect) {
    let backend = TestBackend::new(width, height);
    let terminal = Terminal::new(backend).unwrap();
    let area = Rect::new(0, 0, width, height);
    (terminal, area)
}

/// Every line of the buffer, as text.
pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.y..area.bottom())
        .map(|y| {
            (area.x..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn track(artist: &str, genre: &str, popularity: u32, duration: f64, year: u16) -> RawRecord {
    [
        ("artist_name", artist.to_string()),
        ("artist_genres", format!("['{genre}']")),
        ("artist_popularity", "60".to_string()),
        ("track_popularity", popularity.to_string()),
        ("track_duration_min", duration.to_string()),
        ("album_release_date", format!("{year}-01-01")),
    ]
    .into_iter()
    .collect()
}

/// Two artists with enough tracks for the bar chart, spread over a few years and genres.
pub fn dataset() -> Dataset {
    let mut rows = Vec::new();
    for i in 0..6u16 {
        rows.push(track("Alpha", "pop", 90, 3.5, 2000 + i));
        rows.push(track("Beta", "rock", 80, 2.5, 2002 + i));
    }
    rows.push(track("Gamma", "jazz", 30, 6.0, 2001));
    Dataset::from_rows(rows)
}

pub fn state_with_dataset() -> AppState {
    AppState {
        dataset: Arc::new(dataset()),
        ..AppState::default()
    }
}
