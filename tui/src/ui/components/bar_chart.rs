//! The bar chart of the most popular artists.
//!
//! Clicking a bar (or pressing Enter on the highlighted one) selects its artist, which dims the
//! other bars and narrows the stream chart down to that artist's tracks.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
};
use tokio::sync::mpsc::UnboundedSender;
use trackdash_core::{
    aggregate::ArtistSummary,
    chart::{
        Point,
        bar::{self, BarChartEncoding, GEOMETRY},
    },
    config::BarChartSettings,
    dataset::Dataset,
    pipeline::bar_chart_data,
};

use crate::{
    state::{
        action::{Action, ComponentAction, SelectionAction},
        component::ActiveComponent,
    },
    ui::{
        colors::{AXIS, TEXT_MUTED, TEXT_NORMAL, TOOLTIP_BACKGROUND, rgb},
        surface::{FilledRect, Surface},
    },
};

use super::{AppState, Component, ComponentRender, RenderProps, chart_block};

pub struct BarChart {
    /// Action Sender
    pub action_tx: UnboundedSender<Action>,
    /// Mapped Props from state
    pub(crate) props: Props,
    /// The bar under the mouse, or the one moved to with the keyboard.
    pub(crate) hovered: Option<usize>,
}

pub struct Props {
    dataset: Arc<Dataset>,
    settings: BarChartSettings,
    summaries: Vec<ArtistSummary>,
    pub(crate) selected: Option<String>,
    pub(crate) encoding: BarChartEncoding,
}

impl Props {
    /// Re-encode with the state's selection, only re-aggregating if the dataset changed.
    fn new(state: &AppState, previous: Option<Self>) -> Self {
        let settings = state.settings.bar_chart;
        let summaries = match previous {
            Some(previous)
                if Arc::ptr_eq(&previous.dataset, &state.dataset)
                    && previous.settings == settings =>
            {
                previous.summaries
            }
            _ => bar_chart_data(&state.dataset.rows, settings),
        };
        let encoding = bar::encode(&summaries, state.selected_artist.as_deref());

        Self {
            dataset: state.dataset.clone(),
            settings,
            summaries,
            selected: state.selected_artist.clone(),
            encoding,
        }
    }
}

impl BarChart {
    fn toggle(&self, artist: &str) {
        self.action_tx
            .send(Action::Selection(SelectionAction::Toggle(artist.to_string())))
            .unwrap();
    }
}

impl Component for BarChart {
    fn new(state: &AppState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self {
            action_tx,
            props: Props::new(state, None),
            hovered: None,
        }
    }

    fn move_with_state(self, state: &AppState) -> Self
    where
        Self: Sized,
    {
        let props = Props::new(state, Some(self.props));
        let hovered = self.hovered.filter(|&i| i < props.encoding.bars.len());

        Self {
            props,
            hovered,
            ..self
        }
    }

    fn name(&self) -> &str {
        "Bar Chart"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        let len = self.props.encoding.bars.len();
        if len == 0 {
            return;
        }

        match key.code {
            KeyCode::Left => {
                self.hovered = Some(self.hovered.map_or(0, |i| i.saturating_sub(1)));
            }
            KeyCode::Right => {
                self.hovered = Some(self.hovered.map_or(0, |i| (i + 1).min(len - 1)));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(bar) = self.hovered.and_then(|i| self.props.encoding.bars.get(i)) {
                    self.toggle(&bar.artist);
                }
            }
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect) {
        let MouseEvent {
            kind, column, row, ..
        } = mouse;

        let surface = Surface::new(GEOMETRY.size, area.inner(Margin::new(1, 1)));
        let point = surface.to_logical(column, row);
        let hit = point.and_then(|point| self.props.encoding.hit_test(point));

        match kind {
            MouseEventKind::Moved => {
                self.hovered = hit.and_then(|bar| self.props.encoding.position_of(&bar.artist));
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.action_tx
                    .send(Action::ActiveComponent(ComponentAction::Set(
                        ActiveComponent::BarChart,
                    )))
                    .unwrap();
                if let Some(bar) = hit {
                    self.toggle(&bar.artist);
                }
            }
            _ => {}
        }
    }
}

impl ComponentRender<RenderProps> for BarChart {
    fn render_border(&self, frame: &mut Frame<'_>, props: RenderProps) -> RenderProps {
        let subtitle = self
            .props
            .selected
            .as_ref()
            .map(|artist| format!(" selected: {artist} "));
        let block = chart_block(" Top Artists by Popularity ", subtitle, props.is_focused);
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

        let canvas = surface.canvas(|ctx| {
            for bar in encoding.bars.iter().filter(|bar| !bar.rect.is_empty()) {
                ctx.draw(&FilledRect {
                    surface,
                    rect: bar.rect,
                    color: rgb(bar.fill),
                });
            }
            ctx.draw(&surface.line(
                Point::new(plot.x, plot.y),
                Point::new(plot.x, plot.bottom()),
                AXIS,
            ));
            ctx.draw(&surface.line(
                Point::new(plot.x, plot.bottom()),
                Point::new(plot.right(), plot.bottom()),
                AXIS,
            ));
            ctx.layer();

            // y axis
            for tick in &encoding.y_ticks {
                let x = surface.left_of(plot.x - char_width, &tick.label);
                surface.print(
                    ctx,
                    Point::new(x, tick.position),
                    Line::styled(tick.label.clone(), Style::default().fg(AXIS)),
                );
            }

            // artist names under their bars, cut to the bar's width
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let max_chars = if char_width > 0.0 {
                (encoding.x.step() / char_width).floor().max(1.0) as usize
            } else {
                0
            };
            for bar in &encoding.bars {
                let name: String = bar.artist.chars().take(max_chars).collect();
                let x = surface.centered_on(bar.rect.x + bar.rect.width / 2.0, &name);
                let style = if bar.dimmed {
                    Style::default().fg(TEXT_MUTED)
                } else {
                    Style::default().fg(TEXT_NORMAL)
                };
                surface.print(
                    ctx,
                    Point::new(x, plot.bottom() + char_height),
                    Line::styled(name, style),
                );
            }

            // genre legend
            let legend_x = plot.right() + 2.0 * char_width;
            for (i, entry) in encoding.legend.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let y = plot.y + i as f64 * char_height;
                surface.print(
                    ctx,
                    Point::new(legend_x, y),
                    Line::from(vec![
                        Span::styled("■ ", Style::default().fg(rgb(entry.color))),
                        Span::styled(entry.label.clone(), Style::default().fg(TEXT_NORMAL)),
                    ]),
                );
            }

            if encoding.is_empty() {
                let message = format!(
                    "no artist has {} or more tracks",
                    self.props.settings.min_track_count
                );
                let x = surface.centered_on(plot.x + plot.width / 2.0, &message);
                surface.print(
                    ctx,
                    Point::new(x, plot.y + plot.height / 2.0),
                    Line::styled(message, Style::default().italic().fg(TEXT_MUTED)),
                );
            }

            // tooltip above the hovered bar
            if let Some(bar) = self.hovered.and_then(|i| encoding.bars.get(i)) {
                let lines = bar.tooltip();
                #[allow(clippy::cast_precision_loss)]
                let top = (bar.rect.y.min(plot.bottom()) - (lines.len() as f64 + 0.5) * char_height)
                    .max(0.0);
                for (i, text) in lines.into_iter().enumerate() {
                    #[allow(clippy::cast_precision_loss)]
                    let y = top + i as f64 * char_height;
                    let style = Style::default().fg(TEXT_NORMAL).bg(TOOLTIP_BACKGROUND);
                    let style = if i == 0 { style.bold() } else { style };
                    surface.print(ctx, Point::new(bar.rect.x, y), Line::styled(text, style));
                }
            }
        });

        frame.render_widget(canvas, props.area);
    }
}
