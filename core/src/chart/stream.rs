//! Track counts per popularity band, stacked across the duration buckets.

use serde::Deserialize;
use strum::Display;

use crate::aggregate::{DurationBucket, DurationTable, PopularityBand};

use super::{Geometry, LegendEntry, LinearScale, Margins, Point, PointScale, Rgb, Size, Tick};

pub const GEOMETRY: Geometry = Geometry {
    size: Size::new(900.0, 450.0),
    margins: Margins {
        top: 30.0,
        right: 130.0,
        bottom: 50.0,
        left: 60.0,
    },
};

/// Points sampled along each smoothed segment between two bucket midpoints.
pub const SAMPLES_PER_SEGMENT: usize = 12;
const X_PADDING: f64 = 0.5;
const Y_TICK_COUNT: usize = 5;

/// Where the bottom of the stack sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StackOffset {
    /// Stacked up from zero.
    #[default]
    Zero,
    /// Centered around zero.
    Silhouette,
}

#[must_use]
pub const fn band_color(band: PopularityBand) -> Rgb {
    match band {
        PopularityBand::Low => Rgb::from_hex(0x9ecae1),
        PopularityBand::Medium => Rgb::from_hex(0x4292c6),
        PopularityBand::High => Rgb::from_hex(0x08519c),
    }
}

/// One popularity band's stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub band: PopularityBand,
    pub color: Rgb,
    /// The count in each duration bucket.
    pub counts: [usize; 5],
    /// Smoothed lower edge, left to right.
    pub lower: Vec<Point>,
    /// Smoothed upper edge, left to right.
    pub upper: Vec<Point>,
}

impl Layer {
    /// The outline of the layer's area: the upper edge left to right, then the lower edge back.
    #[must_use]
    pub fn outline(&self) -> Vec<Point> {
        self.upper
            .iter()
            .chain(self.lower.iter().rev())
            .copied()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamEncoding {
    pub geometry: Geometry,
    pub offset: StackOffset,
    pub x: PointScale,
    pub y: LinearScale,
    /// Bottom to top: Low, Medium, High. Empty if there are no tracks.
    pub layers: Vec<Layer>,
    pub legend: Vec<LegendEntry>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

impl StreamEncoding {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[must_use]
pub fn encode(table: &DurationTable, offset: StackOffset) -> StreamEncoding {
    let geometry = GEOMETRY;
    let plot = geometry.plot_area();
    let x = PointScale::new(DurationBucket::ALL.len(), (plot.x, plot.right()), X_PADDING);

    #[allow(clippy::cast_precision_loss)]
    let max_total = table.max_total() as f64;
    let domain = match offset {
        StackOffset::Zero => (0.0, max_total),
        StackOffset::Silhouette => (-max_total / 2.0, max_total / 2.0),
    };
    let y = LinearScale::new(domain, (plot.bottom(), plot.y));

    let x_ticks = DurationBucket::ALL
        .iter()
        .enumerate()
        .filter_map(|(i, bucket)| {
            x.position(i).map(|position| Tick {
                label: bucket.label().to_string(),
                position,
            })
        })
        .collect();
    let y_ticks = if table.is_empty() {
        Vec::new()
    } else {
        y.ticks(Y_TICK_COUNT)
            .into_iter()
            .map(|value| Tick {
                label: format!("{:.0}", value.abs()),
                position: y.scale(value),
            })
            .collect()
    };
    let legend = PopularityBand::ALL
        .iter()
        .map(|&band| LegendEntry {
            label: band.label().to_string(),
            color: band_color(band),
        })
        .collect();

    let layers = if table.is_empty() {
        Vec::new()
    } else {
        stack(table, offset)
            .into_iter()
            .map(|(band, lower, upper)| {
                let edge = |values: [f64; 5]| -> Vec<Point> {
                    let points: Vec<Point> = values
                        .iter()
                        .enumerate()
                        .filter_map(|(i, &v)| x.position(i).map(|px| Point::new(px, y.scale(v))))
                        .collect();
                    monotone_x(&points, SAMPLES_PER_SEGMENT)
                };
                Layer {
                    band,
                    color: band_color(band),
                    counts: table.rows.map(|row| row.count(band)),
                    lower: edge(lower),
                    upper: edge(upper),
                }
            })
            .collect()
    };

    StreamEncoding {
        geometry,
        offset,
        x,
        y,
        layers,
        legend,
        x_ticks,
        y_ticks,
    }
}

/// The `(band, lower, upper)` stack values of each band per bucket, bottom band first.
#[allow(clippy::cast_precision_loss)]
fn stack(table: &DurationTable, offset: StackOffset) -> Vec<(PopularityBand, [f64; 5], [f64; 5])> {
    let mut baseline: [f64; 5] = table.rows.map(|row| match offset {
        StackOffset::Zero => 0.0,
        StackOffset::Silhouette => -(row.total() as f64) / 2.0,
    });
    PopularityBand::ALL
        .iter()
        .map(|&band| {
            let lower = baseline;
            for (base, row) in baseline.iter_mut().zip(table.rows.iter()) {
                *base += row.count(band) as f64;
            }
            (band, lower, baseline)
        })
        .collect()
}

/// Sign of `v`, with zero for zero.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Tangents of a curve through `points` that is monotone between consecutive points.
///
/// `points` must be strictly increasing in x.
fn monotone_tangents(points: &[Point]) -> Vec<f64> {
    let n = points.len();
    if n < 2 {
        return vec![0.0; n];
    }
    let secant = |i: usize| (points[i + 1].y - points[i].y) / (points[i + 1].x - points[i].x);
    if n == 2 {
        return vec![secant(0); 2];
    }

    let mut tangents = vec![0.0; n];
    for i in 1..n - 1 {
        let h0 = points[i].x - points[i - 1].x;
        let h1 = points[i + 1].x - points[i].x;
        let s0 = secant(i - 1);
        let s1 = secant(i);
        let p = (s0 * h1 + s1 * h0) / (h0 + h1);
        tangents[i] = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    }
    // the ends lean on their neighbor's tangent
    tangents[0] = (3.0 * secant(0) - tangents[1]) / 2.0;
    tangents[n - 1] = (3.0 * secant(n - 2) - tangents[n - 2]) / 2.0;
    tangents
}

/// Smooth `points` with a monotone cubic, sampling `samples` points per segment.
///
/// The result passes through every input point and never overshoots between two of them.
#[must_use]
pub fn monotone_x(points: &[Point], samples: usize) -> Vec<Point> {
    if points.len() < 2 || samples == 0 {
        return points.to_vec();
    }
    let tangents = monotone_tangents(points);
    let mut curve = Vec::with_capacity((points.len() - 1) * samples + 1);
    curve.push(points[0]);
    for (i, pair) in points.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let dx = (b.x - a.x) / 3.0;
        let c0 = Point::new(a.x + dx, a.y + dx * tangents[i]);
        let c1 = Point::new(b.x - dx, b.y - dx * tangents[i + 1]);
        for step in 1..=samples {
            #[allow(clippy::cast_precision_loss)]
            let t = step as f64 / samples as f64;
            curve.push(bezier(a, c0, c1, b, t));
        }
    }
    curve
}

fn bezier(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}
