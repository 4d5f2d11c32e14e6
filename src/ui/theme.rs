//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use probewatch_types::MonitorStatus;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] to pick a theme from the terminal background,
/// or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    pub up: Color,
    pub down: Color,
    pub unknown: Color,
    /// Certificates close to expiry.
    pub warning: Color,
    pub border: Color,
    pub muted: Style,
    pub header: Style,
    pub selected: Style,
    /// Active range chip / agent selector entry.
    pub chip_active: Style,
    pub chip_inactive: Style,
    pub border_type: BorderType,
}

impl Theme {
    /// Dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            up: Color::Green,
            down: Color::Red,
            unknown: Color::Gray,
            warning: Color::Yellow,
            border: Color::Gray,
            muted: Style::default().add_modifier(Modifier::DIM),
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            chip_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            chip_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            up: Color::Green,
            down: Color::Red,
            unknown: Color::DarkGray,
            warning: Color::Yellow,
            border: Color::DarkGray,
            muted: Style::default().fg(Color::DarkGray),
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            chip_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            chip_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a monitor or agent status
    pub fn status_style(&self, status: MonitorStatus) -> Style {
        match status {
            MonitorStatus::Up => Style::default().fg(self.up),
            MonitorStatus::Down => Style::default().fg(self.down).add_modifier(Modifier::BOLD),
            MonitorStatus::Unknown => Style::default().fg(self.unknown),
        }
    }

    /// Style for a certificate with `days_left` remaining.
    pub fn cert_style(&self, days_left: Option<i64>) -> Style {
        match days_left {
            Some(d) if d < 7 => Style::default().fg(self.down),
            Some(d) if d < 30 => Style::default().fg(self.warning),
            Some(_) => Style::default().fg(self.up),
            None => self.muted,
        }
    }
}
