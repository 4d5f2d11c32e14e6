//! Monitor list view.
//!
//! One row per public monitor with status, type, target, response times,
//! agent count and certificate expiry.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::format::{format_cert_days, format_response_time};
use crate::source::QueryKey;

/// Render the monitor table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let monitors = app.monitors();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if monitors.is_empty() {
        let key = QueryKey::MonitorList;
        let text = if app.cache.is_loading(&key) {
            "Loading monitors..."
        } else if app.cache.error(&key).is_some() {
            "Could not load monitors"
        } else {
            "No public monitors"
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(app.theme.muted)
            .block(block.title(" Monitors "));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Type"),
        Cell::from("Target"),
        Cell::from("Avg"),
        Cell::from("Max"),
        Cell::from("Agents"),
        Cell::from("Cert"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = monitors
        .iter()
        .map(|m| {
            let cert = m.cert();
            Row::new(vec![
                Cell::from(m.name.clone()),
                Cell::from(m.kind.label()),
                Cell::from(m.display_target().to_string()),
                Cell::from(format_response_time(m.response_time)),
                Cell::from(format_response_time(m.response_time_max)),
                Cell::from(m.agent_count.to_string()),
                Cell::from(match cert {
                    Some(c) => format_cert_days(c.days_left),
                    None => "-".to_string(),
                })
                .style(app.theme.cert_style(cert.and_then(|c| c.days_left))),
                Cell::from(format!("{} {}", m.status.symbol(), m.status.label()))
                    .style(app.theme.status_style(m.status)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3), // Name
        Constraint::Min(6),  // Type
        Constraint::Fill(3), // Target
        Constraint::Fill(1), // Avg
        Constraint::Fill(1), // Max
        Constraint::Min(6),  // Agents
        Constraint::Fill(1), // Cert
        Constraint::Min(9),  // Status
    ];

    let selected = app.selected_index.min(monitors.len().saturating_sub(1));
    let title = format!(" Monitors [{}/{}] ", selected + 1, monitors.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title(title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
