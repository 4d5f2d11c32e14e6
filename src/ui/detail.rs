//! Monitor detail view.
//!
//! Hero section with the aggregate status, the response-time chart and a
//! per-agent table. Missing ids and failed loads render an empty state
//! instead.

use probewatch_types::{AgentMonitorStat, MonitorStatus, PublicMonitor};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, DetailState};
use crate::data::format::{format_cert_days, format_datetime, format_response_time};

/// Render the detail view for the current monitor.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let monitor = match app.detail_state() {
        DetailState::Ready(monitor) => monitor,
        DetailState::MissingId => {
            return render_empty(frame, app, area, "Monitor not found");
        }
        DetailState::Failed(_) => {
            return render_empty(frame, app, area, "Monitor not found or failed to load");
        }
        DetailState::Loading => {
            return render_empty(frame, app, area, "Loading monitor...");
        }
    };

    let stats = app.agent_stats();
    // Borders plus header row plus one line per agent, two when showing a failure
    let table_lines: u16 = stats
        .iter()
        .map(|s| if s.failure().is_some() { 2 } else { 1 })
        .sum();
    let table_height = (table_lines + 3).min(area.height / 3).max(4);

    let chunks = Layout::vertical([
        Constraint::Length(5),            // Hero
        Constraint::Min(8),               // Chart
        Constraint::Length(table_height), // Agents
    ])
    .split(area);

    render_hero(frame, app, monitor, chunks[0]);
    super::chart::render(frame, app, chunks[1]);
    render_agents(frame, app, stats, chunks[2]);
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let y_pad = area.height.saturating_sub(4) / 2;
    let mut lines: Vec<Line> = (0..y_pad).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        message.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Esc: back to monitors", app.theme.muted)));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_hero(frame: &mut Frame, app: &App, monitor: &PublicMonitor, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut first = vec![
        Span::styled(
            format!(" {} {} ", monitor.status.symbol(), monitor.status.label()),
            app.theme.status_style(monitor.status).add_modifier(Modifier::BOLD),
        ),
        Span::styled(monitor.name.clone(), bold),
        Span::styled(format!("  [{}]", monitor.kind.label()), app.theme.muted),
    ];
    if monitor.status == MonitorStatus::Down {
        first.push(Span::styled("  check failing", app.theme.status_style(MonitorStatus::Down)));
    }

    let mut second = vec![
        Span::raw(" Target: "),
        Span::raw(monitor.display_target().to_string()),
        Span::raw("    Avg: "),
        Span::styled(format_response_time(monitor.response_time), bold),
        Span::raw("    Max: "),
        Span::styled(format_response_time(monitor.response_time_max), bold),
        Span::raw("    Agents: "),
        Span::styled(monitor.agent_count.to_string(), bold),
    ];

    if let Some(cert) = monitor.cert() {
        second.push(Span::raw("    Cert: "));
        second.push(Span::styled(
            format!(
                "{} ({})",
                format_cert_days(cert.days_left),
                format_datetime(cert.expiry_time)
            ),
            app.theme.cert_style(cert.days_left),
        ));
    }

    let block = Block::default()
        .title(" Monitor ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(vec![Line::from(first), Line::from(""), Line::from(second)])
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_agents(frame: &mut Frame, app: &App, stats: &[AgentMonitorStat], area: Rect) {
    let block = Block::default()
        .title(format!(" Agents ({}) ", stats.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if stats.is_empty() {
        let paragraph = Paragraph::new("No agent data")
            .alignment(Alignment::Center)
            .style(app.theme.muted)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Agent"),
        Cell::from("Status"),
        Cell::from("Response"),
        Cell::from("Checked"),
        Cell::from("Cert"),
    ])
    .style(app.theme.header);

    let selected = app.filter.selected_agent.agent_id();

    let rows: Vec<Row> = stats
        .iter()
        .map(|s| {
            let color = app.agent_color(&s.agent_id);
            let mut name = vec![Line::from(s.label().to_string())];
            if let Some(failure) = s.failure() {
                name.push(Line::from(Span::styled(
                    format!("  {}", failure),
                    app.theme.status_style(MonitorStatus::Down),
                )));
            }
            let cert = s.cert();

            let row = Row::new(vec![
                Cell::from("■").style(Style::default().fg(color)),
                Cell::from(name),
                Cell::from(format!("{} {}", s.status.symbol(), s.status.label()))
                    .style(app.theme.status_style(s.status)),
                Cell::from(format_response_time(s.response_time)),
                Cell::from(format_datetime(s.checked_at)),
                Cell::from(cert.map_or_else(|| "-".to_string(), |c| format_cert_days(c.days_left)))
                    .style(app.theme.cert_style(cert.and_then(|c| c.days_left))),
            ])
            .height(if s.failure().is_some() { 2 } else { 1 });

            if selected == Some(s.agent_id.as_str()) {
                row.style(app.theme.selected)
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Fill(3),
        Constraint::Min(8),
        Constraint::Fill(1),
        Constraint::Min(19),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
