//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's color palette, with
//! darker indexed colors when the background is light.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeMode;
use crate::rerender::QUOTED_CLASS;

/// Style for a quoted run on the query line.
pub fn quoted_style(light_bg: bool) -> Style {
    Style::default()
        .fg(if light_bg {
            Color::Indexed(22)
        } else {
            Color::Green
        })
        .add_modifier(Modifier::BOLD)
}

/// Style for an element tagged with `class`.
///
/// Unknown classes render like plain text.
pub fn style_for_class(class: &str, light_bg: bool) -> Style {
    if class == QUOTED_CLASS {
        quoted_style(light_bg)
    } else {
        Style::default()
    }
}

pub fn caret_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn hint_style(light_bg: bool) -> Style {
    Style::default().fg(if light_bg {
        Color::Indexed(242)
    } else {
        Color::DarkGray
    })
}

pub fn score_style(light_bg: bool) -> Style {
    Style::default().fg(if light_bg {
        Color::Indexed(24)
    } else {
        Color::Cyan
    })
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

/// Resolve a theme setting against the terminal.
pub fn is_light_background(mode: ThemeMode) -> bool {
    match mode {
        ThemeMode::Light => true,
        ThemeMode::Dark => false,
        ThemeMode::Auto => light_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()),
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); palette entries 7
/// and up are light.
fn light_from_colorfgbg(colorfgbg: Option<&str>) -> bool {
    let Some(value) = colorfgbg else {
        return false;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    bg_str.parse::<u8>().is_ok_and(|bg| bg >= 7)
}
