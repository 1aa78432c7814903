use ratatui::style::Color;
use trackdash_core::chart::{self, Rgb};

/// Converts a chart color to a terminal color.
#[must_use]
pub const fn rgb(value: Rgb) -> Color {
    let Rgb(r, g, b) = value;
    Color::Rgb(r, g, b)
}

// app border colors
pub const APP_BORDER: Color = rgb(Rgb::from_hex(0x6c7086));
pub const APP_BORDER_TEXT: Color = rgb(Rgb::from_hex(0xcba6f7));

// border colors
pub const BORDER_UNFOCUSED: Color = rgb(Rgb::from_hex(0x45475a));
pub const BORDER_FOCUSED: Color = rgb(Rgb::from_hex(0xf5c2e7));

// text colors
pub const TEXT_NORMAL: Color = rgb(Rgb::from_hex(0xcdd6f4));
pub const TEXT_MUTED: Color = rgb(Rgb::from_hex(0x9399b2));
pub const TEXT_HIGHLIGHT: Color = rgb(Rgb::from_hex(0xf38ba8));

// chart colors
pub const CHART_BACKGROUND: Color = rgb(chart::BACKGROUND);
pub const AXIS: Color = rgb(Rgb::from_hex(0x7f849c));
pub const CURSOR: Color = rgb(Rgb::from_hex(0xf9e2af));
pub const TOOLTIP_BACKGROUND: Color = rgb(Rgb::from_hex(0x313244));
