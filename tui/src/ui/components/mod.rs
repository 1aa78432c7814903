pub mod bar_chart;
pub mod heatmap;
pub mod stream_chart;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Style, Stylize},
    text::Span,
    widgets::Block,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::state::action::Action;

use super::{
    AppState,
    colors::{BORDER_FOCUSED, BORDER_UNFOCUSED, TEXT_HIGHLIGHT, TEXT_NORMAL},
};

pub struct RenderProps {
    pub area: Rect,
    pub is_focused: bool,
}

pub trait Component {
    fn new(state: &AppState, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized;
    fn move_with_state(self, state: &AppState) -> Self
    where
        Self: Sized;

    fn name(&self) -> &str;

    fn handle_key_event(&mut self, key: KeyEvent);

    /// `area` is the whole area the component was rendered to, including its border.
    fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect);
}

pub trait ComponentRender<Props> {
    /// Render the border, returning the props to render the content with.
    fn render_border(&self, frame: &mut Frame<'_>, props: Props) -> Props;

    fn render_content(&self, frame: &mut Frame<'_>, props: Props);

    fn render(&self, frame: &mut Frame<'_>, props: Props) {
        let props = self.render_border(frame, props);
        self.render_content(frame, props);
    }
}

/// The bordered block every chart is drawn inside of.
pub(crate) fn chart_block<'a>(title: &'a str, subtitle: Option<String>, focused: bool) -> Block<'a> {
    let border_style = if focused {
        Style::default().fg(BORDER_FOCUSED)
    } else {
        Style::default().fg(BORDER_UNFOCUSED)
    };

    let mut block = Block::bordered()
        .title_top(Span::styled(title, Style::default().bold().fg(TEXT_NORMAL)))
        .border_style(border_style);
    if let Some(subtitle) = subtitle {
        block = block.title_top(
            Span::styled(subtitle, Style::default().italic().fg(TEXT_HIGHLIGHT)).into_right_aligned_line(),
        );
    }
    block
}
