//! Mean popularity per (year, genre), revealed year by year.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use crate::aggregate::PopularityGrid;

use super::{
    BandScale, Geometry, LinearScale, Margins, NEUTRAL_FILL, Point, RectShape, Rgb, Size, Tick,
    sequential,
};

pub const GEOMETRY: Geometry = Geometry {
    size: Size::new(1100.0, 520.0),
    margins: Margins {
        top: 30.0,
        right: 30.0,
        bottom: 60.0,
        left: 140.0,
    },
};

/// Default length of a cell's fade in or out.
pub const REVEAL_TRANSITION: Duration = Duration::from_millis(400);
const CELL_PADDING: f64 = 0.05;
/// Label every n-th year so the axis stays legible.
const MAX_X_TICKS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub year: u16,
    pub genre: String,
    pub avg_popularity: Option<f64>,
    pub rect: RectShape,
    /// Sequential color for the value, [`NEUTRAL_FILL`] without one.
    pub fill: Rgb,
    /// Whether the cell's year has been revealed.
    pub visible: bool,
}

/// The vertical line marking the revealed year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub year: u16,
    pub x: f64,
    pub top: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapEncoding {
    pub geometry: Geometry,
    pub x: BandScale,
    pub y: BandScale,
    pub years: Vec<u16>,
    pub genres: Vec<String>,
    pub cells: Vec<Cell>,
    /// `None` if there are no years.
    pub cursor: Option<Cursor>,
    pub value_range: Option<(f64, f64)>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

impl HeatmapEncoding {
    /// The observed year nearest to `x`, clamped to the first and last years.
    #[must_use]
    pub fn year_at(&self, x: f64) -> Option<u16> {
        self.x
            .nearest_index(x)
            .and_then(|i| self.years.get(i).copied())
    }

    /// Where the cursor line for `year` goes.
    #[must_use]
    pub fn x_of(&self, year: u16) -> Option<f64> {
        let index = self.years.binary_search(&year).ok()?;
        self.x.center(index)
    }

    #[must_use]
    pub fn cell_at(&self, point: Point) -> Option<&Cell> {
        let column = self.x.index_at(point.x)?;
        let row = self.y.index_at(point.y)?;
        self.cells.get(column * self.genres.len() + row)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Years run along x, genres down y. Cells after `revealed_year` are hidden.
#[must_use]
pub fn encode(grid: &PopularityGrid, revealed_year: u16) -> HeatmapEncoding {
    let geometry = GEOMETRY;
    let plot = geometry.plot_area();
    let x = BandScale::new(grid.years.len(), (plot.x, plot.right())).with_padding(CELL_PADDING);
    let y = BandScale::new(grid.genres.len(), (plot.y, plot.bottom())).with_padding(CELL_PADDING);

    let value_range = grid.value_range();
    let color = value_range.map(|range| LinearScale::new(range, (0.0, 1.0)));

    let cells: Vec<Cell> = grid
        .cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            // cells are ordered by year, then genre
            let (column, row) = (i / grid.genres.len(), i % grid.genres.len());
            Cell {
                year: cell.year,
                genre: cell.genre.clone(),
                avg_popularity: cell.avg_popularity,
                rect: RectShape {
                    x: x.position(column).unwrap_or(plot.x),
                    y: y.position(row).unwrap_or(plot.y),
                    width: x.bandwidth(),
                    height: y.bandwidth(),
                },
                fill: match (cell.avg_popularity, color) {
                    (Some(value), Some(color)) => sequential(color.scale(value)),
                    _ => NEUTRAL_FILL,
                },
                visible: cell.year <= revealed_year,
            }
        })
        .collect();

    let cursor = grid
        .years
        .iter()
        .position(|&year| year == revealed_year)
        .and_then(|i| x.center(i))
        .map(|cx| Cursor {
            year: revealed_year,
            x: cx,
            top: plot.y,
            bottom: plot.bottom(),
        });

    let every = grid.years.len().div_ceil(MAX_X_TICKS).max(1);
    let x_ticks = grid
        .years
        .iter()
        .enumerate()
        .step_by(every)
        .filter_map(|(i, year)| {
            x.center(i).map(|position| Tick {
                label: year.to_string(),
                position,
            })
        })
        .collect();
    let y_ticks = grid
        .genres
        .iter()
        .enumerate()
        .filter_map(|(i, genre)| {
            y.center(i).map(|position| Tick {
                label: genre.clone(),
                position,
            })
        })
        .collect();

    HeatmapEncoding {
        geometry,
        x,
        y,
        years: grid.years.clone(),
        genres: grid.genres.clone(),
        cells,
        cursor,
        value_range,
        x_ticks,
        y_ticks,
    }
}

/// Fades cells in and out when the revealed year changes.
///
/// Every year's opacity eases from wherever it was when the revealed year last changed toward
/// 1 (revealed) or 0 (hidden), over the transition's duration.
#[derive(Debug, Clone)]
pub struct RevealTransition {
    duration: Duration,
    revealed: Option<u16>,
    started: Option<Instant>,
    from: BTreeMap<u16, f64>,
}

impl Default for RevealTransition {
    fn default() -> Self {
        Self::new(REVEAL_TRANSITION)
    }
}

impl RevealTransition {
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            revealed: None,
            started: None,
            from: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn revealed(&self) -> Option<u16> {
        self.revealed
    }

    /// Reveal up to `revealed` immediately, without animating.
    pub fn jump(&mut self, revealed: u16) {
        self.revealed = Some(revealed);
        self.started = None;
        self.from.clear();
    }

    /// Start animating every year in `years` toward `revealed`.
    pub fn retarget(&mut self, years: &[u16], revealed: u16, now: Instant) {
        if self.revealed == Some(revealed) {
            return;
        }
        if self.revealed.is_none() {
            self.jump(revealed);
            return;
        }
        self.from = years
            .iter()
            .map(|&year| (year, self.opacity(year, now)))
            .collect();
        self.revealed = Some(revealed);
        self.started = Some(now);
    }

    fn progress(&self, now: Instant) -> f64 {
        match self.started {
            Some(started) if !self.duration.is_zero() => {
                (now.saturating_duration_since(started).as_secs_f64() / self.duration.as_secs_f64())
                    .clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// Opacity of the cells for `year` at `now`, in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self, year: u16, now: Instant) -> f64 {
        let target = match self.revealed {
            Some(revealed) if year > revealed => 0.0,
            _ => 1.0,
        };
        let from = self.from.get(&year).copied().unwrap_or(target);
        from + (target - from) * ease_cubic_in_out(self.progress(now))
    }

    /// Whether any cell is still fading.
    #[must_use]
    pub fn is_animating(&self, now: Instant) -> bool {
        self.started.is_some() && self.progress(now) < 1.0
    }
}

fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::popularity_grid;
    use crate::track::TimelineTrack;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn grid() -> PopularityGrid {
        let track = |year: u16, genre: &str, popularity: f64| TimelineTrack {
            year,
            genre: genre.into(),
            popularity,
        };
        popularity_grid(
            &[
                track(2000, "pop", 40.0),
                track(2001, "rock", 60.0),
                track(2003, "pop", 80.0),
            ],
            &["pop".to_string(), "rock".to_string()],
        )
    }

    #[test]
    fn test_one_cell_per_grid_entry() {
        let encoding = encode(&grid(), 2003);
        assert_eq!(encoding.cells.len(), 6);
        assert!(encoding.cells.iter().all(|cell| cell.visible));
        assert!(encoding.cells.iter().all(|cell| !cell.rect.is_empty()));
        assert_eq!(encoding.value_range, Some((40.0, 80.0)));
    }

    #[test]
    fn test_fills() {
        let encoding = encode(&grid(), 2003);
        let fill = |year: u16, genre: &str| {
            encoding
                .cells
                .iter()
                .find(|cell| cell.year == year && cell.genre == genre)
                .map(|cell| cell.fill)
        };
        assert_eq!(fill(2000, "pop"), Some(sequential(0.0)));
        assert_eq!(fill(2001, "rock"), Some(sequential(0.5)));
        assert_eq!(fill(2003, "pop"), Some(sequential(1.0)));
        assert_eq!(fill(2000, "rock"), Some(NEUTRAL_FILL));
    }

    #[test]
    fn test_visibility_follows_revealed_year() {
        let encoding = encode(&grid(), 2001);
        assert_eq!(
            encoding
                .cells
                .iter()
                .map(|cell| (cell.year, cell.visible))
                .collect::<Vec<_>>(),
            vec![
                (2000, true),
                (2000, true),
                (2001, true),
                (2001, true),
                (2003, false),
                (2003, false)
            ]
        );
        let cursor = encoding.cursor.unwrap();
        assert_eq!(cursor.year, 2001);
        assert_eq!(Some(cursor.x), encoding.x_of(2001));
    }

    #[rstest]
    #[case::before_the_first(-500.0, 2000)]
    #[case::after_the_last(5000.0, 2003)]
    fn test_year_at_is_clamped(#[case] x: f64, #[case] expected: u16) {
        assert_eq!(encode(&grid(), 2000).year_at(x), Some(expected));
    }

    #[test]
    fn test_year_at_snaps_to_nearest() {
        let encoding = encode(&grid(), 2000);
        let step = encoding.x.step();
        let middle = encoding.x_of(2001).unwrap();
        assert_eq!(encoding.year_at(middle), Some(2001));
        assert_eq!(encoding.year_at(middle + step * 0.4), Some(2001));
        assert_eq!(encoding.year_at(middle + step * 0.6), Some(2003));
        assert_eq!(encoding.year_at(middle - step * 0.6), Some(2000));
    }

    #[test]
    fn test_cell_at() {
        let encoding = encode(&grid(), 2003);
        let target = &encoding.cells[3];
        let point = Point::new(
            target.rect.x + target.rect.width / 2.0,
            target.rect.y + target.rect.height / 2.0,
        );
        assert_eq!(encoding.cell_at(point), Some(target));
        assert_eq!((target.year, target.genre.as_str()), (2001, "rock"));
    }

    #[test]
    fn test_empty() {
        let encoding = encode(&PopularityGrid::default(), 2000);
        assert!(encoding.is_empty());
        assert_eq!(encoding.cursor, None);
        assert_eq!(encoding.year_at(500.0), None);
        assert!(encoding.x_ticks.is_empty());
    }

    #[test]
    fn test_x_ticks_are_thinned() {
        let tracks: Vec<TimelineTrack> = (1950..2010)
            .map(|year| TimelineTrack {
                year,
                genre: "pop".into(),
                popularity: 50.0,
            })
            .collect();
        let grid = popularity_grid(&tracks, &["pop".to_string()]);
        let encoding = encode(&grid, 1950);
        assert_eq!(encoding.x_ticks.len(), 12);
        assert_eq!(encoding.x_ticks[1].label, "1955");
    }

    #[test]
    fn test_reveal_transition() {
        let years = [2000, 2001, 2002];
        let start = Instant::now();
        let mut transition = RevealTransition::new(Duration::from_millis(400));

        // nothing to animate from
        transition.retarget(&years, 2000, start);
        assert!(!transition.is_animating(start));
        assert!((transition.opacity(2000, start) - 1.0).abs() < 1e-9);
        assert!(transition.opacity(2001, start).abs() < 1e-9);

        transition.retarget(&years, 2002, start);
        assert!(transition.is_animating(start));
        assert!(transition.opacity(2002, start).abs() < 1e-9);
        let halfway = start + Duration::from_millis(200);
        assert!((transition.opacity(2002, halfway) - 0.5).abs() < 1e-9);
        assert!((transition.opacity(2000, halfway) - 1.0).abs() < 1e-9);

        let done = start + Duration::from_millis(400);
        assert!(!transition.is_animating(done));
        assert!((transition.opacity(2002, done) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_reveal_transition_retargets_midway() {
        let years = [2000, 2001];
        let start = Instant::now();
        let mut transition = RevealTransition::new(Duration::from_millis(400));
        transition.jump(2000);
        transition.retarget(&years, 2001, start);

        // reverse halfway through: 2001 fades back out starting from half opacity
        let halfway = start + Duration::from_millis(200);
        transition.retarget(&years, 2000, halfway);
        assert!((transition.opacity(2001, halfway) - 0.5).abs() < 1e-9);
        assert!(transition.opacity(2001, halfway + Duration::from_millis(400)).abs() < 1e-9);
        assert_eq!(transition.revealed(), Some(2000));
    }
}
