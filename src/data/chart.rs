//! Regrouping of labeled history series into chart rows.
//!
//! The history endpoint returns one series per agent, each with its own
//! timestamps. The chart wants a single table keyed by timestamp with one
//! column per agent, so [`group_series`] pivots the series and
//! [`ChartData::build`] projects the rows back into per-agent point lists
//! for the ratatui chart.

use std::collections::BTreeMap;

use probewatch_types::MetricSeries;
use serde::Serialize;

use super::filter::AgentFilter;
use super::format::format_time_label;

/// Column key used for series that carry no `agent_id` label.
pub const UNKNOWN_AGENT: &str = "unknown";

/// Column key for an agent id, e.g. `agent_a1`.
pub fn agent_key(agent_id: &str) -> String {
    format!("agent_{}", agent_id)
}

/// One row of the chart: a timestamp and the value each agent reported at it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    /// Local `HH:MM` label.
    pub time: String,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Values keyed by [`agent_key`].
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl ChartRow {
    fn new(timestamp: i64) -> Self {
        Self {
            time: format_time_label(timestamp),
            timestamp,
            values: BTreeMap::new(),
        }
    }

    /// Value reported by `agent_id` at this timestamp, if any.
    pub fn value(&self, agent_id: &str) -> Option<f64> {
        self.values.get(&agent_key(agent_id)).copied()
    }

    /// Agent ids with a value in this row.
    pub fn agents(&self) -> impl Iterator<Item = &str> {
        self.values
            .keys()
            .filter_map(|k| k.strip_prefix("agent_"))
    }
}

/// Pivot `response_time` series into rows sorted by ascending timestamp.
///
/// Other series names are ignored. Under a specific agent filter, series for
/// other agents and series without an `agent_id` label are dropped. When two
/// samples for the same agent share a timestamp, the later one wins.
pub fn group_series(series: &[MetricSeries], filter: &AgentFilter) -> Vec<ChartRow> {
    let mut rows: BTreeMap<i64, ChartRow> = BTreeMap::new();

    for s in series.iter().filter(|s| s.is_response_time()) {
        let agent_id = s.agent_id();
        if !filter.matches(agent_id) {
            continue;
        }
        let key = agent_key(agent_id.unwrap_or(UNKNOWN_AGENT));

        for point in &s.data {
            rows.entry(point.timestamp)
                .or_insert_with(|| ChartRow::new(point.timestamp))
                .values
                .insert(key.clone(), point.value);
        }
    }

    rows.into_values().collect()
}

/// Points of one agent, ready to hand to a ratatui `Dataset`.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSeries {
    pub agent_id: String,
    /// `(timestamp_ms, value_ms)` pairs in row order.
    pub points: Vec<(f64, f64)>,
}

/// Rows plus everything needed to draw them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    pub rows: Vec<ChartRow>,
    /// One entry per agent in first-seen order.
    pub series: Vec<AgentSeries>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl ChartData {
    /// Group `series` under `filter` and compute per-agent points and bounds.
    pub fn build(series: &[MetricSeries], filter: &AgentFilter) -> Self {
        let rows = group_series(series, filter);
        Self::from_rows(rows)
    }

    /// Project already grouped rows.
    pub fn from_rows(rows: Vec<ChartRow>) -> Self {
        let mut by_agent: Vec<AgentSeries> = Vec::new();
        let mut max_value: f64 = 0.0;

        for row in &rows {
            for (key, &value) in &row.values {
                let agent_id = key.strip_prefix("agent_").unwrap_or(key);
                let idx = match by_agent.iter().position(|s| s.agent_id == agent_id) {
                    Some(idx) => idx,
                    None => {
                        by_agent.push(AgentSeries {
                            agent_id: agent_id.to_string(),
                            points: Vec::new(),
                        });
                        by_agent.len() - 1
                    }
                };
                by_agent[idx].points.push((row.timestamp as f64, value));
                if value.is_finite() {
                    max_value = max_value.max(value);
                }
            }
        }

        let x_bounds = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) if first.timestamp < last.timestamp => {
                [first.timestamp as f64, last.timestamp as f64]
            }
            (Some(only), _) => [only.timestamp as f64 - 1.0, only.timestamp as f64 + 1.0],
            _ => [0.0, 1.0],
        };
        let y_bounds = [0.0, (max_value * 1.1).max(1.0)];

        Self {
            rows,
            series: by_agent,
            x_bounds,
            y_bounds,
        }
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Agent ids present in the chart.
    pub fn agent_ids(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.agent_id.as_str())
    }

    /// Lines to draw for the given agents, in their order.
    ///
    /// Agents without points are skipped, and series for agents outside
    /// `agent_ids` (including `unknown`) are never drawn.
    pub fn lines_for<'b>(
        &self,
        agent_ids: impl IntoIterator<Item = &'b str>,
    ) -> Vec<&AgentSeries> {
        agent_ids
            .into_iter()
            .filter_map(|id| self.series.iter().find(|s| s.agent_id == id))
            .collect()
    }
}
