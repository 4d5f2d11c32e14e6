//! JSON export of the chart for the monitor currently shown.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use probewatch_types::{AgentMonitorStat, MetricsResponse, MonitorStatus, PublicMonitor, TimeRange};
use ratatui::style::Color;
use serde::Serialize;

use crate::data::{available_agents, group_series, ChartFilter, ChartRow};
use crate::ui::palette::{color_for_agent, ColorMode};

#[derive(Debug, Clone, Serialize)]
pub struct ExportedAgent {
    pub id: String,
    pub label: String,
    pub status: MonitorStatus,
    pub response_time: f64,
    /// Chart color as `#rrggbb`.
    pub color: String,
}

/// Everything needed to redraw the chart elsewhere.
#[derive(Debug, Clone, Serialize)]
pub struct ChartExport {
    pub monitor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<PublicMonitor>,
    pub range: TimeRange,
    /// `"all"` or an agent id.
    pub selected_agent: String,
    pub agents: Vec<ExportedAgent>,
    pub rows: Vec<ChartRow>,
}

impl ChartExport {
    pub fn new(
        monitor_id: &str,
        monitor: Option<&PublicMonitor>,
        stats: &[AgentMonitorStat],
        history: Option<&MetricsResponse>,
        filter: &ChartFilter,
        color_mode: ColorMode,
    ) -> Self {
        let ids: Vec<&str> = stats.iter().map(|s| s.agent_id.as_str()).collect();
        let agents = available_agents(stats)
            .into_iter()
            .zip(stats)
            .map(|(agent, stat)| ExportedAgent {
                color: color_hex(color_for_agent(&agent.id, ids.iter().copied(), color_mode)),
                id: agent.id,
                label: agent.label,
                status: stat.status,
                response_time: stat.response_time,
            })
            .collect();
        let rows = history
            .map(|h| group_series(&h.series, &filter.selected_agent))
            .unwrap_or_default();

        Self {
            monitor_id: monitor_id.to_string(),
            monitor: monitor.cloned(),
            range: filter.time_range,
            selected_agent: filter.selected_agent.to_string(),
            agents,
            rows,
        }
    }

    /// Write pretty-printed JSON to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

fn color_hex(color: Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AgentFilter;
    use probewatch_types::{MetricDataPoint, MetricSeries};

    fn stats() -> Vec<AgentMonitorStat> {
        vec![
            AgentMonitorStat {
                agent_id: "a1".into(),
                agent_name: Some("tokyo".into()),
                status: MonitorStatus::Up,
                response_time: 12.0,
                ..Default::default()
            },
            AgentMonitorStat {
                agent_id: "a2".into(),
                status: MonitorStatus::Down,
                ..Default::default()
            },
        ]
    }

    fn history() -> MetricsResponse {
        MetricsResponse {
            series: vec![
                MetricSeries::new("response_time")
                    .with_label("agent_id", "a1")
                    .with_point(MetricDataPoint::new(100, 10.0)),
                MetricSeries::new("response_time")
                    .with_label("agent_id", "a2")
                    .with_point(MetricDataPoint::new(200, 20.0)),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_export_contents() {
        let mut filter = ChartFilter::default();
        filter.selected_agent = AgentFilter::from("a2");
        let history = history();
        let export =
            ChartExport::new("m1", None, &stats(), Some(&history), &filter, ColorMode::Positional);

        assert_eq!(export.selected_agent, "a2");
        assert_eq!(export.rows.len(), 1);
        assert_eq!(export.agents[0].label, "tokyo");
        assert_eq!(export.agents[0].color, "#3b82f6");
        assert_eq!(export.agents[1].color, "#10b981");
    }

    #[test]
    fn test_export_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        let history = history();
        let export = ChartExport::new(
            "m1",
            None,
            &stats(),
            Some(&history),
            &ChartFilter::default(),
            ColorMode::Positional,
        );
        export.write_to(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["range"], "1d");
        assert_eq!(value["selected_agent"], "all");
        assert_eq!(value["rows"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["rows"][0]["agent_a1"], 10.0);
        assert!(value.get("monitor").is_none());
    }

    #[test]
    fn test_export_without_history() {
        let export = ChartExport::new(
            "m1",
            None,
            &[],
            None,
            &ChartFilter::default(),
            ColorMode::Hashed,
        );
        assert!(export.rows.is_empty());
        assert!(export.agents.is_empty());
    }
}
