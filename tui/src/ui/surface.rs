//! Maps chart geometry onto a terminal canvas.
//!
//! Charts are laid out in a fixed logical coordinate space with `y` growing downward. The
//! canvas is drawn with half-block pixels, two per cell vertically, with `y` growing upward.

use std::ops::Range;

use ratatui::{
    layout::{Position, Rect},
    style::Color,
    symbols::Marker,
    text::Line,
    widgets::canvas::{self, Canvas, Context, Painter, Shape},
};
use trackdash_core::chart::{Point, RectShape, Size};

use super::colors::CHART_BACKGROUND;

/// A chart's logical space, stretched over a terminal area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    size: Size,
    area: Rect,
}

impl Surface {
    #[must_use]
    pub const fn new(size: Size, area: Rect) -> Self {
        Self { size, area }
    }

    #[must_use]
    pub const fn area(&self) -> Rect {
        self.area
    }

    /// Columns and rows of half-block pixels.
    #[must_use]
    pub const fn pixels(&self) -> (usize, usize) {
        (self.area.width as usize, self.area.height as usize * 2)
    }

    /// Width of one terminal cell, in logical units.
    #[must_use]
    pub fn char_width(&self) -> f64 {
        if self.area.width == 0 {
            return 0.0;
        }
        self.size.width / f64::from(self.area.width)
    }

    /// Height of one terminal cell, in logical units.
    #[must_use]
    pub fn char_height(&self) -> f64 {
        if self.area.height == 0 {
            return 0.0;
        }
        self.size.height / f64::from(self.area.height)
    }

    /// The canvas coordinates of a logical point.
    #[must_use]
    pub fn to_canvas(&self, point: Point) -> (f64, f64) {
        (point.x, self.size.height - point.y)
    }

    /// The logical point at the middle of the terminal cell at `column`, `row`.
    ///
    /// `None` if the cell is outside of the surface.
    #[must_use]
    pub fn to_logical(&self, column: u16, row: u16) -> Option<Point> {
        if !self.area.contains(Position::new(column, row)) {
            return None;
        }
        Some(Point::new(
            (f64::from(column - self.area.x) + 0.5) * self.char_width(),
            (f64::from(row - self.area.y) + 0.5) * self.char_height(),
        ))
    }

    /// The logical `x` at the middle of `column`, which may be outside of the surface.
    #[must_use]
    pub fn x_at(&self, column: u16) -> f64 {
        (f64::from(column) - f64::from(self.area.x) + 0.5) * self.char_width()
    }

    /// Where `text` has to start to end at logical `x`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn left_of(&self, x: f64, text: &str) -> f64 {
        x - text.chars().count() as f64 * self.char_width()
    }

    /// Where `text` has to start to be centered on logical `x`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centered_on(&self, x: f64, text: &str) -> f64 {
        x - text.chars().count() as f64 * self.char_width() / 2.0
    }

    /// A canvas spanning the whole logical space.
    pub fn canvas<F>(&self, paint: F) -> Canvas<'static, F>
    where
        F: Fn(&mut Context),
    {
        Canvas::default()
            .marker(Marker::HalfBlock)
            .background_color(CHART_BACKGROUND)
            .x_bounds([0.0, self.size.width])
            .y_bounds([0.0, self.size.height])
            .paint(paint)
    }

    /// A straight line between two logical points.
    #[must_use]
    pub fn line(&self, from: Point, to: Point, color: Color) -> canvas::Line {
        let (x1, y1) = self.to_canvas(from);
        let (x2, y2) = self.to_canvas(to);
        canvas::Line::new(x1, y1, x2, y2, color)
    }

    /// Print `line` starting at the logical point `at`, kept inside the canvas bounds.
    pub fn print(&self, ctx: &mut Context<'_>, at: Point, line: Line<'static>) {
        let (x, y) = self.to_canvas(at);
        ctx.print(
            x.clamp(0.0, self.size.width),
            y.clamp(0.0, self.size.height),
            line,
        );
    }

    fn columns(&self, start: f64, end: f64) -> Range<usize> {
        span(self.pixels().0, self.size.width, start, end)
    }

    fn rows(&self, start: f64, end: f64) -> Range<usize> {
        span(self.pixels().1, self.size.height, start, end)
    }

    #[allow(clippy::cast_precision_loss)]
    fn column_center(&self, column: usize) -> f64 {
        let (columns, _) = self.pixels();
        (column as f64 + 0.5) * self.size.width / columns as f64
    }
}

/// The pixels whose centers fall in `[start, end)`, out of `len` pixels spread over `extent`.
///
/// A non-empty range thinner than a pixel still gets the pixel nearest to its middle.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn span(len: usize, extent: f64, start: f64, end: f64) -> Range<usize> {
    if len == 0 || extent <= 0.0 || end <= start {
        return 0..0;
    }
    let scale = len as f64 / extent;
    let to_pixel = |v: f64| (v * scale - 0.5).ceil().clamp(0.0, len as f64) as usize;
    let (lo, hi) = (to_pixel(start), to_pixel(end));
    if lo < hi {
        return lo..hi;
    }
    let middle = ((start + end) / 2.0 * scale).floor();
    if middle < 0.0 || middle >= len as f64 {
        return 0..0;
    }
    let middle = middle as usize;
    middle..middle + 1
}

/// Linear interpolation of the polyline `points` (sorted by `x`) at `x`.
fn interpolate(points: &[Point], x: f64) -> Option<f64> {
    points.windows(2).find_map(|pair| {
        let (a, b) = (pair[0], pair[1]);
        if x < a.x || x > b.x {
            return None;
        }
        let dx = b.x - a.x;
        if dx.abs() < f64::EPSILON {
            return Some(a.y);
        }
        Some(a.y + (b.y - a.y) * (x - a.x) / dx)
    })
}

/// A solid rectangle.
#[derive(Debug, Clone, Copy)]
pub struct FilledRect {
    pub surface: Surface,
    pub rect: RectShape,
    pub color: Color,
}

impl Shape for FilledRect {
    fn draw(&self, painter: &mut Painter) {
        let rect = self.rect;
        for y in self.surface.rows(rect.y, rect.bottom()) {
            for x in self.surface.columns(rect.x, rect.right()) {
                painter.paint(x, y, self.color);
            }
        }
    }
}

/// The area between two polylines that share their `x` extent.
#[derive(Debug, Clone, Copy)]
pub struct FilledArea<'a> {
    pub surface: Surface,
    pub upper: &'a [Point],
    pub lower: &'a [Point],
    pub color: Color,
}

impl Shape for FilledArea<'_> {
    fn draw(&self, painter: &mut Painter) {
        let (columns, _) = self.surface.pixels();
        for x in 0..columns {
            let center = self.surface.column_center(x);
            let (Some(a), Some(b)) = (
                interpolate(self.upper, center),
                interpolate(self.lower, center),
            ) else {
                continue;
            };
            for y in self.surface.rows(a.min(b), a.max(b)) {
                painter.paint(x, y, self.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_terminal;
    use pretty_assertions::{assert_eq, assert_ne};
    use rstest::rstest;

    const SIZE: Size = Size::new(100.0, 50.0);

    #[rstest]
    #[case::whole(10, 0.0, 100.0, 0..10)]
    #[case::first_half(10, 0.0, 50.0, 0..5)]
    #[case::inner(10, 25.0, 75.0, 2..7)]
    #[case::thin_gets_one_pixel(10, 41.0, 42.0, 4..5)]
    #[case::empty(10, 40.0, 40.0, 0..0)]
    #[case::inverted(10, 60.0, 40.0, 0..0)]
    #[case::outside(10, 120.0, 130.0, 10..10)]
    #[case::no_pixels(0, 0.0, 100.0, 0..0)]
    fn test_span(
        #[case] len: usize,
        #[case] start: f64,
        #[case] end: f64,
        #[case] expected: Range<usize>,
    ) {
        let span = span(len, 100.0, start, end);
        assert_eq!(span.clone().count(), expected.clone().count());
        if !expected.is_empty() {
            assert_eq!(span, expected);
        }
    }

    #[test]
    fn test_to_logical() {
        let surface = Surface::new(SIZE, Rect::new(10, 5, 10, 5));

        let point = surface.to_logical(10, 5).unwrap();
        assert!((point.x - 5.0).abs() < 1e-9);
        assert!((point.y - 5.0).abs() < 1e-9);

        let point = surface.to_logical(19, 9).unwrap();
        assert!((point.x - 95.0).abs() < 1e-9);
        assert!((point.y - 45.0).abs() < 1e-9);

        assert_eq!(surface.to_logical(9, 5), None);
        assert_eq!(surface.to_logical(20, 5), None);
        assert_eq!(surface.to_logical(10, 10), None);

        assert!((surface.x_at(0) + 95.0).abs() < 1e-9);
        assert!((surface.x_at(25) - 155.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_canvas_flips_y() {
        let surface = Surface::new(SIZE, Rect::new(0, 0, 10, 5));
        assert_eq!(surface.to_canvas(Point::new(10.0, 0.0)), (10.0, 50.0));
        assert_eq!(surface.to_canvas(Point::new(10.0, 50.0)), (10.0, 0.0));
    }

    #[test]
    fn test_text_placement() {
        let surface = Surface::new(SIZE, Rect::new(0, 0, 10, 5));
        assert!((surface.left_of(50.0, "ab") - 30.0).abs() < 1e-9);
        assert!((surface.centered_on(50.0, "ab") - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpolate() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 10.0), Point::new(20.0, 0.0)];
        assert_eq!(interpolate(&points, 5.0), Some(5.0));
        assert_eq!(interpolate(&points, 15.0), Some(5.0));
        assert_eq!(interpolate(&points, 25.0), None);
        assert_eq!(interpolate(&[], 5.0), None);
    }

    fn filled_cells(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> usize {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .filter(|cell| cell.symbol() != " ")
            .count()
    }

    #[test]
    fn test_filled_rect() {
        let (mut terminal, area) = setup_test_terminal(10, 5);
        let surface = Surface::new(SIZE, area);
        let shape = FilledRect {
            surface,
            // left half, top three fifths
            rect: RectShape {
                x: 0.0,
                y: 0.0,
                width: 50.0,
                height: 30.0,
            },
            color: Color::Red,
        };
        terminal
            .draw(|frame| frame.render_widget(surface.canvas(|ctx| ctx.draw(&shape)), area))
            .unwrap();

        assert_eq!(filled_cells(&terminal), 15);
        let buffer = terminal.backend().buffer();
        assert_ne!(buffer[(0, 0)].symbol(), " ");
        assert_eq!(buffer[(9, 4)].symbol(), " ");
    }

    #[test]
    fn test_zero_area_rect_draws_nothing() {
        let (mut terminal, area) = setup_test_terminal(10, 5);
        let surface = Surface::new(SIZE, area);
        let shape = FilledRect {
            surface,
            rect: RectShape {
                x: 20.0,
                y: 20.0,
                width: 0.0,
                height: 10.0,
            },
            color: Color::Red,
        };
        terminal
            .draw(|frame| frame.render_widget(surface.canvas(|ctx| ctx.draw(&shape)), area))
            .unwrap();

        assert_eq!(filled_cells(&terminal), 0);
    }

    #[test]
    fn test_filled_area() {
        let (mut terminal, area) = setup_test_terminal(10, 5);
        let surface = Surface::new(SIZE, area);
        let upper = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let lower = [Point::new(0.0, 50.0), Point::new(100.0, 50.0)];
        let shape = FilledArea {
            surface,
            upper: &upper,
            lower: &lower,
            color: Color::Blue,
        };
        terminal
            .draw(|frame| frame.render_widget(surface.canvas(|ctx| ctx.draw(&shape)), area))
            .unwrap();

        assert_eq!(filled_cells(&terminal), 50);
    }
}
