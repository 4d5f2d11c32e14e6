//! Query layer between the REST client and the views.
//!
//! Every resource the dashboard shows is addressed by a [`QueryKey`] that
//! carries its full parameter tuple. The [`Fetcher`] runs requests on the
//! tokio runtime and reports back over a channel; the [`QueryCache`] keeps
//! the last good value per key and decides when a key is due again.

mod cache;
mod fetcher;

pub use cache::{CacheEntry, QueryCache};
pub use fetcher::{fetch, Fetcher};

use std::fmt;

use probewatch_types::{AgentMonitorStat, MetricsResponse, PublicMonitor, TimeRange};

/// Identity of a cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `GET /api/monitors`
    MonitorList,
    /// `GET /api/monitors/{id}`
    MonitorDetail(String),
    /// `GET /api/monitors/{id}/agents`
    AgentStats(String),
    /// `GET /api/monitors/{id}/history?range=..`
    History(String, TimeRange),
}

impl QueryKey {
    /// Whether the key is refreshed on the poll interval.
    ///
    /// History is only fetched when its key changes or on manual refresh.
    pub fn polls(&self) -> bool {
        !matches!(self, QueryKey::History(..))
    }

    /// Monitor id the key refers to, if any.
    pub fn monitor_id(&self) -> Option<&str> {
        match self {
            QueryKey::MonitorList => None,
            QueryKey::MonitorDetail(id) | QueryKey::AgentStats(id) | QueryKey::History(id, _) => {
                Some(id)
            }
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::MonitorList => write!(f, "monitors"),
            QueryKey::MonitorDetail(id) => write!(f, "monitor/{}", id),
            QueryKey::AgentStats(id) => write!(f, "monitor/{}/agents", id),
            QueryKey::History(id, range) => write!(f, "monitor/{}/history?range={}", id, range),
        }
    }
}

/// Payload of a successful query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Monitors(Vec<PublicMonitor>),
    Detail(PublicMonitor),
    AgentStats(Vec<AgentMonitorStat>),
    History(MetricsResponse),
}

/// Completion message sent from a fetch task to the UI thread.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub key: QueryKey,
    /// Sequence number handed out by [`QueryCache::begin`].
    pub seq: u64,
    pub outcome: Result<QueryData, String>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) use super::fetcher::tests::FakeApi;

    #[test]
    fn test_only_history_skips_polling() {
        assert!(QueryKey::MonitorList.polls());
        assert!(QueryKey::MonitorDetail("m1".into()).polls());
        assert!(QueryKey::AgentStats("m1".into()).polls());
        assert!(!QueryKey::History("m1".into(), TimeRange::OneDay).polls());
    }

    #[test]
    fn test_keys_include_range() {
        let a = QueryKey::History("m1".into(), TimeRange::OneDay);
        let b = QueryKey::History("m1".into(), TimeRange::OneHour);
        assert_ne!(a, b);
        assert_eq!(a.monitor_id(), Some("m1"));
        assert_eq!(a.to_string(), "monitor/m1/history?range=1d");
    }
}
