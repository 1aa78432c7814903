//! Visual encodings: pure functions from aggregated data (and interaction state) to shapes in a
//! chart's logical coordinate system.
//!
//! Logical coordinates have their origin at the top-left of the chart, with y growing downward.
//! Mapping them onto the screen is the renderer's job.

pub mod bar;
pub mod heatmap;
pub mod stream;

pub use heatmap::RevealTransition;
pub use stream::StackOffset;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// A chart's logical size and the margins around its plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub size: Size,
    pub margins: Margins,
}

impl Geometry {
    #[must_use]
    pub const fn inner_width(&self) -> f64 {
        self.size.width - self.margins.left - self.margins.right
    }

    #[must_use]
    pub const fn inner_height(&self) -> f64 {
        self.size.height - self.margins.top - self.margins.bottom
    }

    /// The area inside the margins.
    #[must_use]
    pub const fn plot_area(&self) -> RectShape {
        RectShape {
            x: self.margins.left,
            y: self.margins.top,
            width: self.inner_width(),
            height: self.inner_height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle, `(x, y)` is its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectShape {
    #[must_use]
    pub const fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub const fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `point` is inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Rectangles with no area are never drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A label at a position along an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub label: String,
    pub position: f64,
}

/// A legend swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Interpolate between `self` (`t = 0`) and `other` (`t = 1`), `t` is clamped.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }

    /// `self` drawn at `opacity` over `background`.
    #[must_use]
    pub fn blend_over(self, background: Self, opacity: f64) -> Self {
        background.lerp(self, opacity)
    }
}

/// Background the charts are drawn on.
pub const BACKGROUND: Rgb = Rgb::from_hex(0x1e1e2e);
/// Fill for cells with no value.
pub const NEUTRAL_FILL: Rgb = Rgb::from_hex(0x45475a);
/// Opacity of marks pushed to the background by a selection.
pub const DIMMED_OPACITY: f64 = 0.3;

/// Tableau 10.
pub const CATEGORICAL: [Rgb; 10] = [
    Rgb::from_hex(0x4e79a7),
    Rgb::from_hex(0xf28e2c),
    Rgb::from_hex(0xe15759),
    Rgb::from_hex(0x76b7b2),
    Rgb::from_hex(0x59a14f),
    Rgb::from_hex(0xedc949),
    Rgb::from_hex(0xaf7aa1),
    Rgb::from_hex(0xff9da7),
    Rgb::from_hex(0x9c755f),
    Rgb::from_hex(0xbab0ab),
];

/// Yellow-orange-red, low to high.
const SEQUENTIAL_STOPS: [Rgb; 5] = [
    Rgb::from_hex(0xffffcc),
    Rgb::from_hex(0xfed976),
    Rgb::from_hex(0xfd8d3c),
    Rgb::from_hex(0xe31a1c),
    Rgb::from_hex(0x800026),
];

/// The sequential color at `t` in `[0, 1]`, `t` is clamped.
#[must_use]
pub fn sequential(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let segments = (SEQUENTIAL_STOPS.len() - 1) as f64;
    let scaled = t * segments;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let i = (scaled.floor() as usize).min(SEQUENTIAL_STOPS.len() - 2);
    SEQUENTIAL_STOPS[i].lerp(SEQUENTIAL_STOPS[i + 1], scaled - i as f64)
}

/// Hands out [`CATEGORICAL`] colors to keys in the order the keys are first seen.
///
/// Colors repeat once the palette is exhausted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoricalPalette {
    keys: Vec<String>,
}

impl CategoricalPalette {
    /// The color for `key`, assigning the next one if `key` is new.
    pub fn color(&mut self, key: &str) -> Rgb {
        let index = self.keys.iter().position(|k| k == key).unwrap_or_else(|| {
            self.keys.push(key.to_string());
            self.keys.len() - 1
        });
        CATEGORICAL[index % CATEGORICAL.len()]
    }

    /// One entry per key, in the order the keys were first seen.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.keys
            .iter()
            .enumerate()
            .map(|(i, key)| LegendEntry {
                label: key.clone(),
                color: CATEGORICAL[i % CATEGORICAL.len()],
            })
            .collect()
    }
}

/// Maps a continuous domain onto a continuous range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Not clamped, values outside the domain land outside the range.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    #[must_use]
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    #[must_use]
    pub fn invert(&self, position: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < f64::EPSILON {
            return (d0 + d1) / 2.0;
        }
        d0 + (position - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Round values across the domain, about `count` of them.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = (self.domain.0.min(self.domain.1), self.domain.0.max(self.domain.1));
        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        if (hi - lo).abs() < f64::EPSILON {
            return vec![lo];
        }
        let step = nice_step((hi - lo) / count as f64);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// The 1, 2 or 5 times a power of ten nearest above `raw`.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Splits a continuous range into `len` evenly spaced bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    pub len: usize,
    pub range: (f64, f64),
    /// Fraction of a step left empty between bands.
    pub padding_inner: f64,
    /// Fraction of a step left empty before the first and after the last band.
    pub padding_outer: f64,
}

impl BandScale {
    #[must_use]
    pub const fn new(len: usize, range: (f64, f64)) -> Self {
        Self {
            len,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    #[must_use]
    pub const fn with_padding(mut self, padding: f64) -> Self {
        self.padding_inner = padding;
        self.padding_outer = padding;
        self
    }

    /// Distance between the starts of two adjacent bands.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn step(&self) -> f64 {
        let bands = (self.len as f64 - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        (self.range.1 - self.range.0) / bands
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Where band `index` starts, `None` if there is no such band.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, index: usize) -> Option<f64> {
        (index < self.len)
            .then(|| self.range.0 + self.step() * (self.padding_outer + index as f64))
    }

    /// Where the middle of band `index` is.
    #[must_use]
    pub fn center(&self, index: usize) -> Option<f64> {
        self.position(index)
            .map(|start| start + self.bandwidth() / 2.0)
    }

    /// The band `position` falls inside of, padding excluded.
    #[must_use]
    pub fn index_at(&self, position: f64) -> Option<usize> {
        let index = self.nearest_index(position)?;
        let start = self.position(index)?;
        (position >= start && position <= start + self.bandwidth()).then_some(index)
    }

    /// The band whose middle is closest to `position`, clamped to the first and last bands.
    #[must_use]
    pub fn nearest_index(&self, position: f64) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let step = self.step();
        if step.abs() < f64::EPSILON || position.is_nan() {
            return Some(0);
        }
        let first_center = self.center(0)?;
        let offset = ((position - first_center) / step).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let index = offset.clamp(0.0, (self.len - 1) as f64) as usize;
        Some(index)
    }
}

/// Evenly spaced points across a continuous range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointScale {
    pub len: usize,
    pub range: (f64, f64),
    /// Fraction of a step left empty at each end.
    pub padding: f64,
}

impl PointScale {
    #[must_use]
    pub const fn new(len: usize, range: (f64, f64), padding: f64) -> Self {
        Self {
            len,
            range,
            padding,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn step(&self) -> f64 {
        let gaps = (self.len.saturating_sub(1) as f64 + 2.0 * self.padding).max(1.0);
        (self.range.1 - self.range.0) / gaps
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, index: usize) -> Option<f64> {
        (index < self.len).then(|| self.range.0 + self.step() * (self.padding + index as f64))
    }
}
