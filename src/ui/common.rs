//! Common UI components shared across views.
//!
//! This module contains the header bar, status bar, and help overlay.

use std::time::Instant;

use probewatch_types::MonitorStatus;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, DetailState, View};
use crate::data::format::format_age;
use crate::source::QueryKey;

/// Render the header bar.
///
/// Displays: overall up/down counts on the list, monitor name and status on
/// the detail view, and the API endpoint.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " PROBEWATCH ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    match app.view {
        View::MonitorList => {
            let monitors = app.monitors();
            let up = monitors.iter().filter(|m| m.status == MonitorStatus::Up).count();
            let down = monitors.iter().filter(|m| m.status == MonitorStatus::Down).count();

            spans.push(Span::raw("│ "));
            spans.push(Span::styled(
                up.to_string(),
                app.theme.status_style(MonitorStatus::Up),
            ));
            spans.push(Span::raw(" up "));
            if down > 0 {
                spans.push(Span::styled(
                    down.to_string(),
                    app.theme.status_style(MonitorStatus::Down),
                ));
            } else {
                spans.push(Span::styled("0", app.theme.muted));
            }
            spans.push(Span::raw(format!(" down │ {} monitors ", monitors.len())));
        }
        View::MonitorDetail => {
            spans.push(Span::raw("│ "));
            match app.detail_state() {
                DetailState::Ready(monitor) => {
                    spans.push(Span::styled(
                        format!("{} ", monitor.status.symbol()),
                        app.theme.status_style(monitor.status),
                    ));
                    spans.push(Span::styled(
                        monitor.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::raw(" "));
                }
                DetailState::MissingId => spans.push(Span::raw("No monitor ")),
                DetailState::Loading | DetailState::Failed(_) => {
                    let id = app.monitor_id.as_deref().unwrap_or_default();
                    spans.push(Span::raw(format!("{} ", id)));
                }
            }
        }
    }

    spans.push(Span::styled(format!("│ {}", app.endpoint), app.theme.muted));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows: view, age of the data on screen, available controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let (key, controls) = match app.view {
        View::MonitorList => (
            Some(QueryKey::MonitorList),
            "↑↓:select Enter:open r:refresh ?:help q:quit",
        ),
        View::MonitorDetail => (
            app.monitor_id
                .as_deref()
                .map(|id| QueryKey::MonitorDetail(id.to_string())),
            "t/T:range a/A:agent 0:all e:export Esc:back ?:help q:quit",
        ),
    };

    let status = match key {
        Some(key) => {
            let now = Instant::now();
            match (app.cache.age(&key, now), app.cache.error(&key)) {
                (Some(age), _) => format!(
                    " {} | Updated {} ago | {}",
                    app.view.label(),
                    format_age(age),
                    controls
                ),
                (None, Some(err)) => format!(" Error: {} | r:retry q:quit", err),
                (None, None) => format!(" Loading... | {}", controls),
            }
        }
        None => format!(" {} | {}", app.view.label(), controls),
    };

    let paragraph = Paragraph::new(status).style(app.theme.muted);
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Monitor list"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Open monitor"),
        Line::from(""),
        section(" Monitor detail"),
        Line::from("  t / ]       Next time range"),
        Line::from("  T / [       Previous time range"),
        Line::from("  1-5         1h 6h 1d 3d 7d"),
        Line::from("  a / A       Next/previous agent"),
        Line::from("  0           All agents"),
        Line::from("  e           Export chart to JSON"),
        Line::from("  Esc         Back to list"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Refresh now"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled("Press any key to close", app.theme.muted)]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 25u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
