//! Colors and styles for the wizard screens
//!
//! Every widget takes its styling from here so the screens stay consistent.

use ratatui::style::{Color, Modifier, Style};

/// Color palette
pub struct Colors;

impl Colors {
    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Hints and secondary text
    pub const FG_MUTED: Color = Color::DarkGray;

    /// Titles and the input field
    pub const PRIMARY: Color = Color::Cyan;

    /// Mask characters and summary labels
    pub const SECONDARY: Color = Color::Yellow;

    /// Error notices
    pub const ERROR: Color = Color::Red;
}

/// Pre-built styles
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    /// Screen titles: bold.
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted list row: reversed video.
    pub fn selected() -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    pub fn input() -> Style {
        Style::default().fg(Colors::PRIMARY)
    }

    pub fn label() -> Style {
        Style::default().fg(Colors::SECONDARY)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Colors::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }
}
