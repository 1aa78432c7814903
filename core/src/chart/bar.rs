//! Top artists by mean track popularity.

use crate::aggregate::ArtistSummary;

use super::{
    BACKGROUND, BandScale, CategoricalPalette, DIMMED_OPACITY, Geometry, LegendEntry, LinearScale,
    Margins, Point, RectShape, Rgb, Size, Tick,
};

pub const GEOMETRY: Geometry = Geometry {
    size: Size::new(750.0, 450.0),
    margins: Margins {
        top: 30.0,
        right: 160.0,
        bottom: 90.0,
        left: 60.0,
    },
};

/// Bar heights are on a fixed scale, artists below 70 are not expected after selection.
pub const Y_DOMAIN: (f64, f64) = (70.0, 100.0);
const BAND_PADDING: f64 = 0.2;
const Y_TICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub artist: String,
    pub genre: String,
    pub avg_popularity: f64,
    pub artist_popularity: f64,
    pub track_count: usize,
    /// Empty when the popularity is below the scale, such bars are not drawn.
    pub rect: RectShape,
    /// The genre color.
    pub color: Rgb,
    /// The color to draw, `color` dimmed if another artist is selected.
    pub fill: Rgb,
    pub dimmed: bool,
}

impl Bar {
    /// Hover text.
    #[must_use]
    pub fn tooltip(&self) -> Vec<String> {
        vec![
            self.artist.clone(),
            format!("Artist popularity: {:.0}", self.artist_popularity),
            format!("Tracks: {}", self.track_count),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartEncoding {
    pub geometry: Geometry,
    pub x: BandScale,
    pub y: LinearScale,
    pub bars: Vec<Bar>,
    /// Genres in the order they first appear in `bars`.
    pub legend: Vec<LegendEntry>,
    pub y_ticks: Vec<Tick>,
}

impl BarChartEncoding {
    /// The bar whose column `point` is in, anywhere inside the plot area.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&Bar> {
        let plot = self.geometry.plot_area();
        if point.y < plot.y || point.y > plot.bottom() {
            return None;
        }
        self.x.index_at(point.x).and_then(|i| self.bars.get(i))
    }

    #[must_use]
    pub fn tooltip_at(&self, point: Point) -> Option<Vec<String>> {
        self.hit_test(point).map(Bar::tooltip)
    }

    #[must_use]
    pub fn position_of(&self, artist: &str) -> Option<usize> {
        self.bars.iter().position(|bar| bar.artist == artist)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// One bar per summary, in the given order.
#[must_use]
pub fn encode(summaries: &[ArtistSummary], selected: Option<&str>) -> BarChartEncoding {
    let geometry = GEOMETRY;
    let plot = geometry.plot_area();
    let x = BandScale::new(summaries.len(), (plot.x, plot.right())).with_padding(BAND_PADDING);
    let y = LinearScale::new(Y_DOMAIN, (plot.bottom(), plot.y));

    let mut palette = CategoricalPalette::default();
    let bars = summaries
        .iter()
        .enumerate()
        .map(|(i, summary)| {
            let color = palette.color(&summary.primary_genre);
            let dimmed = selected.is_some_and(|selected| selected != summary.artist);
            let top = y.scale(summary.avg_popularity);
            Bar {
                artist: summary.artist.clone(),
                genre: summary.primary_genre.clone(),
                avg_popularity: summary.avg_popularity,
                artist_popularity: summary.artist_popularity,
                track_count: summary.track_count,
                rect: RectShape {
                    x: x.position(i).unwrap_or(plot.x),
                    y: top,
                    width: x.bandwidth(),
                    height: plot.bottom() - top,
                },
                color,
                fill: if dimmed {
                    color.blend_over(BACKGROUND, DIMMED_OPACITY)
                } else {
                    color
                },
                dimmed,
            }
        })
        .collect();

    let y_ticks = y
        .ticks(Y_TICK_COUNT)
        .into_iter()
        .map(|value| Tick {
            label: format!("{value:.0}"),
            position: y.scale(value),
        })
        .collect();

    BarChartEncoding {
        geometry,
        x,
        y,
        bars,
        legend: palette.legend(),
        y_ticks,
    }
}
