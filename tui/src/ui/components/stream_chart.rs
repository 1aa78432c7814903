//! The stream chart of track counts by duration, stacked by popularity band.
//!
//! Follows the bar chart's selection: with an artist selected only their tracks are counted.

use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use log::debug;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
};
use tokio::sync::mpsc::UnboundedSender;
use trackdash_core::{
    chart::{
        Point, StackOffset,
        stream::{self, GEOMETRY, StreamEncoding},
    },
    dataset::Dataset,
    pipeline::{stream_chart_data, stream_chart_tracks},
    track::DurationTrack,
};

use crate::{
    state::{
        action::{Action, ComponentAction},
        component::ActiveComponent,
    },
    ui::{
        colors::{AXIS, TEXT_MUTED, TEXT_NORMAL, rgb},
        surface::{FilledArea, Surface},
    },
};

use super::{AppState, Component, ComponentRender, RenderProps, chart_block};

pub struct StreamChart {
    /// Action Sender
    pub action_tx: UnboundedSender<Action>,
    /// Mapped Props from state
    pub(crate) props: Props,
}

pub struct Props {
    dataset: Arc<Dataset>,
    tracks: Vec<DurationTrack>,
    pub(crate) selected: Option<String>,
    pub(crate) encoding: StreamEncoding,
}

impl Props {
    /// Refilter with the state's selection, only re-normalizing if the dataset changed.
    fn new(state: &AppState, previous: Option<Self>) -> Self {
        let tracks = match previous {
            Some(previous) if Arc::ptr_eq(&previous.dataset, &state.dataset) => previous.tracks,
            _ => stream_chart_tracks(&state.dataset.rows),
        };
        let table = stream_chart_data(&tracks, state.selected_artist.as_deref());
        debug!(
            "stream chart: {} of {} tracks for {:?}",
            table.total(),
            tracks.len(),
            state.selected_artist
        );
        let encoding = stream::encode(&table, state.settings.stream_chart.offset);

        Self {
            dataset: state.dataset.clone(),
            tracks,
            selected: state.selected_artist.clone(),
            encoding,
        }
    }
}

impl Component for StreamChart {
    fn new(state: &AppState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self {
            action_tx,
            props: Props::new(state, None),
        }
    }

    fn move_with_state(self, state: &AppState) -> Self
    where
        Self: Sized,
    {
        Self {
            props: Props::new(state, Some(self.props)),
            ..self
        }
    }

    fn name(&self) -> &str {
        "Stream Chart"
    }

    fn handle_key_event(&mut self, _key: KeyEvent) {}

    fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect) {
        if mouse.kind == MouseEventKind::Down(MouseButton::Left)
            && area.contains(Position::new(mouse.column, mouse.row))
        {
            self.action_tx
                .send(Action::ActiveComponent(ComponentAction::Set(
                    ActiveComponent::StreamChart,
                )))
                .unwrap();
        }
    }
}

impl ComponentRender<RenderProps> for StreamChart {
    fn render_border(&self, frame: &mut Frame<'_>, props: RenderProps) -> RenderProps {
        let subtitle = Some(self.props.selected.as_ref().map_or_else(
            || " all artists ".to_string(),
            |artist| format!(" {artist} "),
        ));
        let block = chart_block(" Tracks by Duration ", subtitle, props.is_focused);
        let area = block.inner(props.area);
        frame.render_widget(block, props.area);

        RenderProps { area, ..props }
    }

    fn render_content(&self, frame: &mut Frame<'_>, props: RenderProps) {
        if props.area.is_empty() {
            return;
        }
        let surface = Surface::new(GEOMETRY.size, props.area);
        let encoding = &self.props.encoding;
        let plot = encoding.geometry.plot_area();
        let (char_width, char_height) = (surface.char_width(), surface.char_height());

        let canvas = surface.canvas(|ctx| {
            for layer in &encoding.layers {
                ctx.draw(&FilledArea {
                    surface,
                    upper: &layer.upper,
                    lower: &layer.lower,
                    color: rgb(layer.color),
                });
            }
            if encoding.offset == StackOffset::Zero {
                ctx.draw(&surface.line(
                    Point::new(plot.x, plot.y),
                    Point::new(plot.x, plot.bottom()),
                    AXIS,
                ));
            }
            ctx.draw(&surface.line(
                Point::new(plot.x, plot.bottom()),
                Point::new(plot.right(), plot.bottom()),
                AXIS,
            ));
            ctx.layer();

            for tick in &encoding.y_ticks {
                let x = surface.left_of(plot.x - char_width, &tick.label);
                surface.print(
                    ctx,
                    Point::new(x, tick.position),
                    Line::styled(tick.label.clone(), Style::default().fg(AXIS)),
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
            let title = "duration (min)";
            surface.print(
                ctx,
                Point::new(
                    surface.centered_on(plot.x + plot.width / 2.0, title),
                    plot.bottom() + 2.5 * char_height,
                ),
                Line::styled(title, Style::default().italic().fg(TEXT_MUTED)),
            );

            // popularity legend, the top of the stack first
            let legend_x = plot.right() + 2.0 * char_width;
            for (i, entry) in encoding.legend.iter().rev().enumerate() {
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
                let message = "no tracks";
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_text, setup_test_terminal, state_with_dataset};
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tokio::sync::mpsc::unbounded_channel;
    use trackdash_core::{
        aggregate::{DurationBucket, PopularityBand},
        config::{Settings, StreamChartSettings},
    };

    fn counts(chart: &StreamChart, band: PopularityBand) -> [usize; 5] {
        chart
            .props
            .encoding
            .layers
            .iter()
            .find(|layer| layer.band == band)
            .map(|layer| layer.counts)
            .unwrap()
    }

    #[test]
    fn test_props() {
        let (tx, _) = unbounded_channel();
        let chart = StreamChart::new(&state_with_dataset(), tx);

        assert_eq!(chart.props.encoding.layers.len(), 3);
        let high = counts(&chart, PopularityBand::High);
        // Alpha's 3.5 minute tracks and Beta's 2.5 minute tracks
        assert_eq!(high[DurationBucket::ThreeToFour.index()], 6);
        assert_eq!(high[DurationBucket::TwoToThree.index()], 6);
        // Gamma's 6 minute track
        assert_eq!(counts(&chart, PopularityBand::Low)[DurationBucket::FivePlus.index()], 1);
        assert_eq!(chart.name(), "Stream Chart");
    }

    #[test]
    fn test_selection_refilters() {
        let (tx, _) = unbounded_channel();
        let state = state_with_dataset();
        let chart = StreamChart::new(&state, tx);

        let chart = chart.move_with_state(&AppState {
            selected_artist: Some("Beta".into()),
            ..state_with_dataset()
        });
        // a fresh dataset, so the tracks were normalized again
        let high = counts(&chart, PopularityBand::High);
        assert_eq!(high[DurationBucket::ThreeToFour.index()], 0);
        assert_eq!(high[DurationBucket::TwoToThree.index()], 6);

        let chart = chart.move_with_state(&AppState {
            selected_artist: Some("Nobody".into()),
            ..state
        });
        assert!(chart.props.encoding.is_empty());
    }

    #[test]
    fn test_offset_from_settings() {
        let (tx, _) = unbounded_channel();
        let state = AppState {
            settings: Settings {
                stream_chart: StreamChartSettings {
                    offset: StackOffset::Silhouette,
                },
                ..Settings::default()
            },
            ..state_with_dataset()
        };
        let chart = StreamChart::new(&state, tx);
        assert_eq!(chart.props.encoding.offset, StackOffset::Silhouette);
    }

    #[test]
    fn test_click_focuses() {
        let (tx, mut rx) = unbounded_channel();
        let mut chart = StreamChart::new(&state_with_dataset(), tx);
        let area = Rect::new(10, 0, 50, 20);

        chart.handle_mouse_event(
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 20,
                row: 5,
                modifiers: KeyModifiers::empty(),
            },
            area,
        );
        assert_eq!(
            rx.blocking_recv().unwrap(),
            Action::ActiveComponent(ComponentAction::Set(ActiveComponent::StreamChart))
        );
    }

    #[rstest]
    #[case::all(None, "all artists")]
    #[case::selected(Some("Alpha"), "Alpha")]
    fn smoke_render(#[case] selected: Option<&str>, #[case] subtitle: &str) {
        let (tx, _) = unbounded_channel();
        let chart = StreamChart::new(
            &AppState {
                selected_artist: selected.map(ToString::to_string),
                ..state_with_dataset()
            },
            tx,
        );
        let (mut terminal, area) = setup_test_terminal(100, 40);

        let frame = terminal
            .draw(|frame| {
                chart.render(
                    frame,
                    RenderProps {
                        area,
                        is_focused: true,
                    },
                );
            })
            .unwrap();
        let text = buffer_text(frame.buffer);
        assert!(text.contains("Tracks by Duration"));
        assert!(text.contains(subtitle));
        assert!(text.contains("3-4"));
        assert!(text.contains("High"));
    }

    #[test]
    fn smoke_render_empty() {
        let (tx, _) = unbounded_channel();
        let chart = StreamChart::new(&AppState::default(), tx);
        let (mut terminal, area) = setup_test_terminal(100, 40);

        let frame = terminal
            .draw(|frame| {
                chart.render(
                    frame,
                    RenderProps {
                        area,
                        is_focused: false,
                    },
                );
            })
            .unwrap();
        assert!(buffer_text(frame.buffer).contains("no tracks"));
    }
}
