use clap::ValueEnum;
use ratatui::{
    style::{Color, Modifier, Style},
    symbols,
};
use serde::Deserialize;

/// Presentation variant of the dashboard.
///
/// `Rich` uses emoji icons, one card per line, rounded borders and unicode
/// bar glyphs. `Compact` sticks to ASCII and packs the summary cards onto
/// one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PresentationStyle {
    #[default]
    Rich,
    Compact,
}

/// Icons and glyph sets for one presentation style.
#[derive(Debug, Clone)]
pub struct IconSet {
    pub flights: &'static str,
    pub price: &'static str,
    pub calendar: &'static str,
    pub route: &'static str,
    pub loading: &'static str,
    pub error: &'static str,
    pub success: &'static str,
    pub top_row: &'static str,
    pub bars: symbols::bar::Set,
    pub border: symbols::border::Set,
    /// Whether gauges may use sub-cell unicode blocks.
    pub unicode_gauge: bool,
}

const ASCII_BARS: symbols::bar::Set = symbols::bar::Set {
    full: "#",
    seven_eighths: "#",
    three_quarters: "=",
    five_eighths: "=",
    half: "-",
    three_eighths: "-",
    one_quarter: ".",
    one_eighth: ".",
    empty: " ",
};

const ASCII_BORDER: symbols::border::Set = symbols::border::Set {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "-",
    horizontal_bottom: "-",
};

const RICH: IconSet = IconSet {
    flights: "🛫",
    price: "🏷",
    calendar: "📅",
    route: "🧭",
    loading: "⏳",
    error: "⚠",
    success: "✔",
    top_row: "★",
    bars: symbols::bar::NINE_LEVELS,
    border: symbols::border::ROUNDED,
    unicode_gauge: true,
};

const COMPACT: IconSet = IconSet {
    flights: ">",
    price: "$",
    calendar: "#",
    route: "~",
    loading: "...",
    error: "!",
    success: "ok",
    top_row: "*",
    bars: ASCII_BARS,
    border: ASCII_BORDER,
    unicode_gauge: false,
};

// Panel text styles
pub const TITLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
pub const LABEL: Style = Style::new().fg(Color::Gray);
pub const HEADER: Style = Style::new().add_modifier(Modifier::BOLD);
pub const MUTED: Style = Style::new().fg(Color::DarkGray);

// Accent styles
pub const HIGHLIGHT: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
pub const BAR: Style = Style::new().fg(Color::Cyan);
pub const GAUGE: Style = Style::new().fg(Color::Magenta);
pub const ERROR: Style = Style::new().fg(Color::Red);
pub const SUCCESS: Style = Style::new().fg(Color::Green);

impl PresentationStyle {
    pub fn icons(self) -> &'static IconSet {
        match self {
            PresentationStyle::Rich => &RICH,
            PresentationStyle::Compact => &COMPACT,
        }
    }

    /// Whether cards get their own lines.
    pub fn is_verbose(self) -> bool {
        matches!(self, PresentationStyle::Rich)
    }
}
