//! Labeled time-series returned by the monitor history endpoint.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Name of the series carrying per-agent response times.
pub const RESPONSE_TIME_SERIES: &str = "response_time";

/// Label key identifying the agent that produced a series.
pub const AGENT_ID_LABEL: &str = "agent_id";

/// Read an explicit `null` as the type's default.
///
/// The backend encodes empty lists and maps as `null`.
#[cfg(feature = "serde")]
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single `(timestamp, value)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricDataPoint {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Sample value (milliseconds for `response_time`).
    pub value: f64,
}

impl MetricDataPoint {
    /// Create a new data point.
    pub const fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A named, labeled, time-ordered list of samples.
///
/// Several series may share timestamps, but nothing guarantees they are
/// aligned with each other.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricSeries {
    /// Series name, e.g. `response_time`.
    pub name: String,

    /// Extra labels; at minimum `agent_id` for per-agent series.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "null_as_default",
            skip_serializing_if = "BTreeMap::is_empty"
        )
    )]
    pub labels: BTreeMap<String, String>,

    /// Samples in the order the backend returned them.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "null_as_default")
    )]
    pub data: Vec<MetricDataPoint>,
}

impl MetricSeries {
    /// Create an empty series with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a label (builder style).
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Append a sample (builder style).
    pub fn with_point(mut self, point: MetricDataPoint) -> Self {
        self.data.push(point);
        self
    }

    /// Look up a label value.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// The `agent_id` label, if present.
    pub fn agent_id(&self) -> Option<&str> {
        self.label(AGENT_ID_LABEL)
    }

    /// Whether this is a response-time series.
    pub fn is_response_time(&self) -> bool {
        self.name == RESPONSE_TIME_SERIES
    }
}

/// Body of `GET /api/monitors/{id}/history`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MetricsResponse {
    /// Agent the query was scoped to; empty for monitor-wide history.
    #[cfg_attr(feature = "serde", serde(default))]
    pub agent_id: String,

    /// Metric type the backend resolved, e.g. `monitor`.
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub metric_type: String,

    /// Window echoed back by the backend as `"<start>-<end>"` in milliseconds.
    ///
    /// Informational only; the requested [`TimeRange`](crate::TimeRange) is
    /// what identifies a history query.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "null_as_default")
    )]
    pub range: String,

    /// All series in the response.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "null_as_default")
    )]
    pub series: Vec<MetricSeries>,
}

impl MetricsResponse {
    /// Iterate over the `response_time` series only.
    pub fn response_time_series(&self) -> impl Iterator<Item = &MetricSeries> {
        self.series.iter().filter(|s| s.is_response_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_builder() {
        let series = MetricSeries::new("response_time")
            .with_label("agent_id", "a1")
            .with_label("region", "eu")
            .with_point(MetricDataPoint::new(100, 20.0));

        assert!(series.is_response_time());
        assert_eq!(series.agent_id(), Some("a1"));
        assert_eq!(series.label("region"), Some("eu"));
        assert_eq!(series.label("missing"), None);
        assert_eq!(series.data, vec![MetricDataPoint::new(100, 20.0)]);
    }

    #[test]
    fn test_series_without_agent_label() {
        let series = MetricSeries::new("packet_loss");
        assert!(!series.is_response_time());
        assert!(series.agent_id().is_none());
    }

    #[test]
    fn test_response_time_series_filter() {
        let response = MetricsResponse {
            series: vec![
                MetricSeries::new("response_time").with_label("agent_id", "a1"),
                MetricSeries::new("packet_loss").with_label("agent_id", "a1"),
                MetricSeries::new("response_time").with_label("agent_id", "a2"),
            ],
            ..Default::default()
        };

        let agents: Vec<_> = response
            .response_time_series()
            .filter_map(|s| s.agent_id())
            .collect();
        assert_eq!(agents, vec!["a1", "a2"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_history_response() {
        let json = r#"{
            "agentId": "",
            "type": "monitor",
            "range": "1700000000000-1700021600000",
            "series": [
                {
                    "name": "response_time",
                    "labels": {"agent_id": "a1"},
                    "data": [{"timestamp": 100, "value": 20.5}]
                },
                {"name": "status", "data": []}
            ]
        }"#;

        let response: MetricsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.metric_type, "monitor");
        assert_eq!(response.range, "1700000000000-1700021600000");
        assert_eq!(response.series.len(), 2);
        assert_eq!(response.series[0].data[0], MetricDataPoint::new(100, 20.5));
        assert!(response.series[1].labels.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_missing_series() {
        let response: MetricsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.series.is_empty());
        assert!(response.range.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_null_series() {
        let json = r#"{"agentId":"","type":"monitor","range":"1-2","series":null}"#;
        let response: MetricsResponse = serde_json::from_str(json).unwrap();
        assert!(response.series.is_empty());
        assert_eq!(response.response_time_series().count(), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_null_data_and_labels() {
        let json = r#"{
            "range": "1700000000000-1700086400000",
            "series": [
                {"name": "response_time", "labels": {"agent_id": "a1"}, "data": null},
                {"name": "response_time", "labels": null, "data": [{"timestamp": 5, "value": 1.0}]}
            ]
        }"#;

        let response: MetricsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.series.len(), 2);
        assert!(response.series[0].data.is_empty());
        assert_eq!(response.series[0].agent_id(), Some("a1"));
        assert!(response.series[1].labels.is_empty());
        assert_eq!(response.series[1].data, vec![MetricDataPoint::new(5, 1.0)]);
    }
}
