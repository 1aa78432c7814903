//! The heatmap of average popularity per genre and year.
//!
//! Cells are revealed up to the cursor's year. Clicking or dragging moves the cursor to the
//! nearest year, Left/Right step it one year at a time.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use log::debug;
use ratatui::{
    Frame,
    layout::{Margin, Position, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
};
use tokio::sync::mpsc::UnboundedSender;
use trackdash_core::{
    aggregate::PopularityGrid,
    chart::{
        BACKGROUND, Point, RevealTransition,
        heatmap::{self, GEOMETRY, HeatmapEncoding},
        sequential,
    },
    config::HeatmapSettings,
    dataset::Dataset,
    pipeline::heatmap_data,
    state::TimestepCursor,
};

use crate::{
    state::{
        action::{Action, ComponentAction},
        component::ActiveComponent,
    },
    ui::{
        colors::{AXIS, CURSOR, TEXT_MUTED, TEXT_NORMAL, rgb},
        surface::{FilledRect, Surface},
    },
};

use super::{AppState, Component, ComponentRender, RenderProps, chart_block};

/// Cells fainter than this are not drawn at all.
const MIN_OPACITY: f64 = 0.01;
/// Swatches in the color legend.
const LEGEND_STEPS: u32 = 8;

pub struct Heatmap {
    /// Action Sender
    pub action_tx: UnboundedSender<Action>,
    /// Mapped Props from state
    pub(crate) props: Props,
    /// The revealed year, `None` when there are no years.
    pub(crate) cursor: Option<TimestepCursor>,
    pub(crate) transition: RevealTransition,
    /// Whether the left button went down inside the heatmap and hasn't come up yet.
    pub(crate) dragging: bool,
}

pub struct Props {
    dataset: Arc<Dataset>,
    settings: HeatmapSettings,
    grid: PopularityGrid,
    pub(crate) encoding: HeatmapEncoding,
}

impl Heatmap {
    /// Rebuild everything from the state's dataset, the cursor starts over at the first year.
    fn load(&mut self, state: &AppState) {
        let settings = state.settings.heatmap;
        let grid = heatmap_data(&state.dataset.rows, settings);
        self.cursor = TimestepCursor::new(grid.years.iter().copied());
        self.transition = RevealTransition::new(Duration::from_millis(
            settings.reveal_transition_ms,
        ));
        let revealed = self.cursor.as_ref().map_or(0, TimestepCursor::year);
        self.transition.jump(revealed);

        self.props = Props {
            dataset: state.dataset.clone(),
            settings,
            encoding: heatmap::encode(&grid, revealed),
            grid,
        };
    }

    /// Re-encode after the cursor moved, fading the cells that changed.
    fn reveal(&mut self, year: u16) {
        let Some(cursor) = self.cursor.as_ref() else {
            return;
        };
        if self.transition.revealed() == Some(year) {
            return;
        }
        debug!("heatmap revealed through {year}");
        self.transition.retarget(cursor.years(), year, Instant::now());
        self.props.encoding = heatmap::encode(&self.props.grid, year);
    }

    fn seek_x(&mut self, x: f64) {
        let Some(year) = self.props.encoding.year_at(x) else {
            return;
        };
        if let Some(cursor) = self.cursor.as_mut() {
            let year = cursor.seek(year);
            self.reveal(year);
        }
    }

    fn step(&mut self, delta: isize) {
        if let Some(cursor) = self.cursor.as_mut() {
            let year = cursor.step(delta);
            self.reveal(year);
        }
    }

    fn seek_index(&mut self, index: usize) {
        if let Some(cursor) = self.cursor.as_mut() {
            let year = cursor.seek_index(index);
            self.reveal(year);
        }
    }

    #[must_use]
    pub fn revealed_year(&self) -> Option<u16> {
        self.cursor.as_ref().map(TimestepCursor::year)
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether a fade is still running and the heatmap needs to be redrawn.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_animating(Instant::now())
    }
}

impl Component for Heatmap {
    fn new(state: &AppState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        let mut heatmap = Self {
            action_tx,
            props: Props {
                dataset: Arc::default(),
                settings: state.settings.heatmap,
                grid: PopularityGrid::default(),
                encoding: heatmap::encode(&PopularityGrid::default(), 0),
            },
            cursor: None,
            transition: RevealTransition::default(),
            dragging: false,
        };
        heatmap.load(state);
        heatmap
    }

    fn move_with_state(mut self, state: &AppState) -> Self
    where
        Self: Sized,
    {
        // the cursor only depends on the dataset
        if !Arc::ptr_eq(&self.props.dataset, &state.dataset)
            || self.props.settings != state.settings.heatmap
        {
            self.load(state);
            self.dragging = false;
        }
        self
    }

    fn name(&self) -> &str {
        "Heatmap"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.step(-1),
            KeyCode::Right => self.step(1),
            KeyCode::Home => self.seek_index(0),
            KeyCode::End => self.seek_index(usize::MAX),
            _ => {}
        }
    }

    /// Drags keep tracking the cursor outside of `area`, snapping to the first or last year.
    fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect) {
        let MouseEvent {
            kind, column, row, ..
        } = mouse;
        let surface = Surface::new(GEOMETRY.size, area.inner(Margin::new(1, 1)));

        match kind {
            MouseEventKind::Down(MouseButton::Left)
                if area.contains(Position::new(column, row)) =>
            {
                self.action_tx
                    .send(Action::ActiveComponent(ComponentAction::Set(
                        ActiveComponent::Heatmap,
                    )))
                    .unwrap();
                self.dragging = true;
                self.seek_x(surface.x_at(column));
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging => {
                self.seek_x(surface.x_at(column));
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = false,
            _ => {}
        }
    }
}

impl ComponentRender<RenderProps> for Heatmap {
    fn render_border(&self, frame: &mut Frame<'_>, props: RenderProps) -> RenderProps {
        let subtitle = self
            .revealed_year()
            .map(|year| format!(" through {year} "));
        let block = chart_block(" Popularity by Genre and Year ", subtitle, props.is_focused);
        let area = block.inner(props.area);
        frame.render_widget(block, props.area);

        RenderProps { area, ..props }
    }

    #[allow(clippy::too_many_lines)]
    fn render_content(&self, frame: &mut Frame<'_>, props: RenderProps) {
        if props.area.is_empty() {
            return;
        }
        let surface = Surface::new(GEOMETRY.size, props.area);
        let encoding = &self.props.encoding;
        let plot = encoding.geometry.plot_area();
        let (char_width, char_height) = (surface.char_width(), surface.char_height());
        let now = Instant::now();

        let canvas = surface.canvas(|ctx| {
            for cell in &encoding.cells {
                let opacity = self.transition.opacity(cell.year, now);
                if opacity < MIN_OPACITY || cell.rect.is_empty() {
                    continue;
                }
                ctx.draw(&FilledRect {
                    surface,
                    rect: cell.rect,
                    color: rgb(cell.fill.blend_over(BACKGROUND, opacity)),
                });
            }
            if let Some(cursor) = &encoding.cursor {
                ctx.draw(&surface.line(
                    Point::new(cursor.x, cursor.top),
                    Point::new(cursor.x, cursor.bottom),
                    CURSOR,
                ));
            }
            ctx.layer();

            for tick in &encoding.y_ticks {
                let x = surface.left_of(plot.x - char_width, &tick.label);
                surface.print(
                    ctx,
                    Point::new(x, tick.position),
                    Line::styled(tick.label.clone(), Style::default().fg(TEXT_NORMAL)),
                );
            }
            for tick in &encoding.x_ticks {
                let x = surface.centered_on(tick.position, &tick.label);
                surface.print(
                    ctx,
                    Point::new(x, plot.bottom() + char_height),
                    Line::styled(tick.label.clone(), Style::default().fg(AXIS)),
                );
            }

            if let Some(cursor) = &encoding.cursor {
                let label = cursor.year.to_string();
                let x = surface.centered_on(cursor.x, &label);
                surface.print(
                    ctx,
                    Point::new(x, plot.y - char_height),
                    Line::styled(label, Style::default().bold().fg(CURSOR)),
                );
            }

            // color legend, the lowest average on the left
            if let Some((min, max)) = encoding.value_range {
                let mut spans = vec![Span::styled(
                    format!("{min:.0} "),
                    Style::default().fg(TEXT_MUTED),
                )];
                spans.extend((0..LEGEND_STEPS).map(|i| {
                    let t = f64::from(i) / f64::from(LEGEND_STEPS - 1);
                    Span::styled("■", Style::default().fg(rgb(sequential(t))))
                }));
                spans.push(Span::styled(
                    format!(" {max:.0} avg popularity"),
                    Style::default().fg(TEXT_MUTED),
                ));
                surface.print(
                    ctx,
                    Point::new(plot.x, plot.bottom() + 2.5 * char_height),
                    Line::from(spans),
                );
            }

            if encoding.is_empty() {
                let message = "no tracks with a release year";
                surface.print(
                    ctx,
                    Point::new(
                        surface.centered_on(plot.x + plot.width / 2.0, message),
                        plot.y + plot.height / 2.0,
                    ),
                    Line::styled(message, Style::default().italic().fg(TEXT_MUTED)),
                );
            }
        });

        frame.render_widget(canvas, props.area);
    }
}
