//! Handles the main application view logic and state.
//!
//! The `App` struct is responsible for rendering the state of the application to the terminal.
//! The app is updated every tick, and they use the state stores to get the latest state.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Margin, Position, Rect},
    style::{Style, Stylize},
    text::Span,
    widgets::Block,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::state::{
    action::{Action, ComponentAction, GeneralAction, SelectionAction},
    component::ActiveComponent,
};

use super::{
    AppState,
    colors::{APP_BORDER, APP_BORDER_TEXT, TEXT_NORMAL},
    components::{
        Component, ComponentRender, RenderProps, bar_chart::BarChart, heatmap::Heatmap,
        stream_chart::StreamChart,
    },
};

#[must_use]
pub struct App {
    /// Action Sender
    pub action_tx: UnboundedSender<Action>,
    /// active component
    active_component: ActiveComponent,
    // Components that are always in view
    bar_chart: BarChart,
    stream_chart: StreamChart,
    heatmap: Heatmap,
}

impl App {
    fn get_active_view_component(&self) -> &dyn Component {
        match self.active_component {
            ActiveComponent::BarChart => &self.bar_chart,
            ActiveComponent::StreamChart => &self.stream_chart,
            ActiveComponent::Heatmap => &self.heatmap,
        }
    }

    fn get_active_view_component_mut(&mut self) -> &mut dyn Component {
        match self.active_component {
            ActiveComponent::BarChart => &mut self.bar_chart,
            ActiveComponent::StreamChart => &mut self.stream_chart,
            ActiveComponent::Heatmap => &mut self.heatmap,
        }
    }

    /// Move the app with the given state, but only update components that need to be updated.
    ///
    /// in this case, that is every chart
    pub fn move_with_dataset(self, state: &AppState) -> Self {
        self.move_with_state(state)
    }

    /// Move the app with the given state, but only update components that need to be updated.
    ///
    /// in this case, that is the bar chart (highlight) and the stream chart (filter)
    pub fn move_with_selection(self, state: &AppState) -> Self {
        Self {
            bar_chart: self.bar_chart.move_with_state(state),
            stream_chart: self.stream_chart.move_with_state(state),
            ..self
        }
    }

    /// Move the app with the given state, but only update components that need to be updated.
    ///
    /// in this case, that is the active component
    pub fn move_with_component(self, state: &AppState) -> Self {
        Self {
            active_component: state.active_component,
            ..self
        }
    }
}

impl Component for App {
    fn new(state: &AppState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        Self {
            action_tx: action_tx.clone(),
            active_component: state.active_component,
            //
            bar_chart: BarChart::new(state, action_tx.clone()),
            stream_chart: StreamChart::new(state, action_tx.clone()),
            heatmap: Heatmap::new(state, action_tx),
        }
    }

    fn move_with_state(self, state: &AppState) -> Self
    where
        Self: Sized,
    {
        Self {
            active_component: state.active_component,
            bar_chart: self.bar_chart.move_with_state(state),
            stream_chart: self.stream_chart.move_with_state(state),
            heatmap: self.heatmap.move_with_state(state),
            ..self
        }
    }

    // defer to the active component
    fn name(&self) -> &str {
        self.get_active_view_component().name()
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // if it's a exit, or navigation command, handle it here.
        // otherwise, defer to the active component
        match key.code {
            // exit the application
            KeyCode::Esc => {
                self.action_tx
                    .send(Action::General(GeneralAction::Exit))
                    .unwrap();
            }
            // cycle through the components
            KeyCode::Tab => self
                .action_tx
                .send(Action::ActiveComponent(ComponentAction::Next))
                .unwrap(),
            KeyCode::BackTab => self
                .action_tx
                .send(Action::ActiveComponent(ComponentAction::Previous))
                .unwrap(),
            // clear the selected artist
            KeyCode::Char('c') => self
                .action_tx
                .send(Action::Selection(SelectionAction::Clear))
                .unwrap(),
            // defer to the active component
            _ => self.get_active_view_component_mut().handle_key_event(key),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect) {
        // adjust area to exclude the border
        let area = area.inner(Margin::new(1, 1));

        let Areas {
            bar_chart,
            stream_chart,
            heatmap,
        } = split_area(area);

        // a drag that started in the heatmap stays with it, wherever the mouse goes
        if self.heatmap.is_dragging()
            && matches!(mouse.kind, MouseEventKind::Drag(_) | MouseEventKind::Up(_))
        {
            self.heatmap.handle_mouse_event(mouse, heatmap);
            return;
        }

        // the bar chart hides its tooltip once the mouse leaves it
        if mouse.kind == MouseEventKind::Moved {
            self.bar_chart.handle_mouse_event(mouse, bar_chart);
            return;
        }

        // defer to the component that the mouse is in
        let mouse_position = Position::new(mouse.column, mouse.row);
        if bar_chart.contains(mouse_position) {
            self.bar_chart.handle_mouse_event(mouse, bar_chart);
        } else if stream_chart.contains(mouse_position) {
            self.stream_chart.handle_mouse_event(mouse, stream_chart);
        } else if heatmap.contains(mouse_position) {
            self.heatmap.handle_mouse_event(mouse, heatmap);
        }
    }
}

#[derive(Debug)]
struct Areas {
    pub bar_chart: Rect,
    pub stream_chart: Rect,
    pub heatmap: Rect,
}

fn split_area(area: Rect) -> Areas {
    let [top, heatmap] = *Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Fill(1)].as_ref())
        .split(area)
    else {
        panic!("Failed to split frame into areas")
    };

    let [bar_chart, stream_chart] = *Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(5), Constraint::Fill(6)].as_ref())
        .split(top)
    else {
        panic!("Failed to split top area")
    };

    Areas {
        bar_chart,
        stream_chart,
        heatmap,
    }
}

impl ComponentRender<Rect> for App {
    fn render_border(&self, frame: &mut Frame<'_>, area: Rect) -> Rect {
        let block = Block::bordered()
            .title_top(Span::styled(
                "TRACKDASH",
                Style::default().bold().fg(APP_BORDER_TEXT),
            ))
            .title_bottom(Span::styled(
                "Tab/Shift+Tab to switch focus | ←/→ to move | Enter/click to select | c to clear | Esc to quit",
                Style::default().fg(APP_BORDER_TEXT),
            ))
            .border_style(Style::default().fg(APP_BORDER))
            .style(Style::default().fg(TEXT_NORMAL));
        let app_area = block.inner(area);
        debug_assert_eq!(area.inner(Margin::new(1, 1)), app_area);

        frame.render_widget(block, area);
        app_area
    }

    fn render_content(&self, frame: &mut Frame<'_>, area: Rect) {
        let Areas {
            bar_chart,
            stream_chart,
            heatmap,
        } = split_area(area);

        // figure out the active component, and give it a different colored border
        let (bar_chart_focused, stream_chart_focused, heatmap_focused) =
            match self.active_component {
                ActiveComponent::BarChart => (true, false, false),
                ActiveComponent::StreamChart => (false, true, false),
                ActiveComponent::Heatmap => (false, false, true),
            };

        self.bar_chart.render(
            frame,
            RenderProps {
                area: bar_chart,
                is_focused: bar_chart_focused,
            },
        );
        self.stream_chart.render(
            frame,
            RenderProps {
                area: stream_chart,
                is_focused: stream_chart_focused,
            },
        );
        self.heatmap.render(
            frame,
            RenderProps {
                area: heatmap,
                is_focused: heatmap_focused,
            },
        );
    }
}
