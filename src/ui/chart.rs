//! Response-time chart with range chips and agent selector.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use probewatch_types::TimeRange;

use crate::app::App;
use crate::data::format::{format_axis_label, format_response_time};
use crate::data::{AgentFilter, ChartData};

/// Render the chart panel: controls on top, plot below.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Response time ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Range chips + agent selector
        Constraint::Min(3),    // Plot
    ])
    .split(inner);

    render_controls(frame, app, chunks[0]);

    let data = app.chart_data();
    if data.is_empty() {
        render_placeholder(frame, app, chunks[1]);
        return;
    }
    render_plot(frame, app, &data, chunks[1]);
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for range in TimeRange::ALL {
        let style = if range == app.filter.time_range {
            app.theme.chip_active
        } else {
            app.theme.chip_inactive
        };
        spans.push(Span::styled(format!(" {} ", range.as_str()), style));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled("│ Agent: ", app.theme.muted));
    let agent_style = match &app.filter.selected_agent {
        AgentFilter::All => Style::default().add_modifier(Modifier::BOLD),
        AgentFilter::Agent(id) => Style::default()
            .fg(app.agent_color(id))
            .add_modifier(Modifier::BOLD),
    };
    spans.push(Span::styled(app.agent_filter_label(), agent_style));

    let count = app.available_agents().len();
    if count > 0 {
        spans.push(Span::styled(format!(" ({} agents)", count), app.theme.muted));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_placeholder(frame: &mut Frame, app: &App, area: Rect) {
    let loading = app
        .history_key()
        .is_some_and(|key| app.cache.is_loading(&key));
    let text = if loading {
        "Loading history..."
    } else {
        "No data for this range"
    };

    let y = area.y + area.height / 2;
    let line_area = Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, 1);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(app.theme.muted),
        line_area,
    );
}

fn render_plot(frame: &mut Frame, app: &App, data: &ChartData, area: Rect) {
    let span = app.filter.time_range.duration();

    // Only agents in the stats list get a line, in table order
    let stats = app.agent_stats();
    let datasets: Vec<Dataset> = data
        .lines_for(stats.iter().map(|stat| stat.agent_id.as_str()))
        .into_iter()
        .map(|s| {
            let name = stats
                .iter()
                .find(|stat| stat.agent_id == s.agent_id)
                .map_or(s.agent_id.as_str(), |stat| stat.label());
            Dataset::default()
                .name(name.to_string())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.agent_color(&s.agent_id)))
                .data(&s.points)
        })
        .collect();

    let [x_min, x_max] = data.x_bounds;
    let x_labels = vec![
        Span::raw(format_axis_label(x_min as i64, span)),
        Span::raw(format_axis_label(((x_min + x_max) / 2.0) as i64, span)),
        Span::raw(format_axis_label(x_max as i64, span)),
    ];

    let [_, y_max] = data.y_bounds;
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format_response_time(y_max / 2.0)),
        Span::raw(format_response_time(y_max)),
    ];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(app.theme.muted)
                .bounds(data.x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(app.theme.muted)
                .bounds(data.y_bounds)
                .labels(y_labels),
        )
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    frame.render_widget(chart, area);
}
