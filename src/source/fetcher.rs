//! Background fetch tasks.
//!
//! Requests run on the tokio runtime and report back through a bounded
//! channel. The UI thread drains it with [`Fetcher::drain`] without blocking.

use std::sync::Arc;

use probewatch_client::{ClientError, MonitorApi};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{FetchResult, QueryData, QueryKey};

/// Spawns fetches for query keys and collects their results.
#[derive(Debug)]
pub struct Fetcher {
    api: Arc<dyn MonitorApi>,
    handle: Handle,
    tx: mpsc::Sender<FetchResult>,
    rx: mpsc::Receiver<FetchResult>,
}

impl Fetcher {
    /// Create a fetcher that spawns onto `handle`.
    pub fn new(api: Arc<dyn MonitorApi>, handle: Handle) -> Self {
        let (tx, rx) = mpsc::channel(64);
        Self {
            api,
            handle,
            tx,
            rx,
        }
    }

    /// Create a fetcher on the runtime of the calling task.
    ///
    /// Panics outside a tokio runtime, like [`Handle::current`].
    pub fn current(api: Arc<dyn MonitorApi>) -> Self {
        Self::new(api, Handle::current())
    }

    /// Start a request for `key`; the result arrives tagged with `seq`.
    pub fn spawn(&self, key: QueryKey, seq: u64) {
        let api = self.api.clone();
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            debug!(%key, seq, "fetching");
            let outcome = fetch(api.as_ref(), &key).await.map_err(|e| {
                warn!(%key, error = %e, "fetch failed");
                e.to_string()
            });
            // Receiver gone means the app is shutting down
            let _ = tx.send(FetchResult { key, seq, outcome }).await;
        });
    }

    /// Take one completed result, if any.
    pub fn try_recv(&mut self) -> Option<FetchResult> {
        self.rx.try_recv().ok()
    }

    /// Take all completed results.
    pub fn drain(&mut self) -> Vec<FetchResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            results.push(result);
        }
        results
    }
}

/// Run the request behind `key`.
pub async fn fetch(api: &dyn MonitorApi, key: &QueryKey) -> Result<QueryData, ClientError> {
    match key {
        QueryKey::MonitorList => api.list_monitors().await.map(QueryData::Monitors),
        QueryKey::MonitorDetail(id) => api.monitor(id).await.map(QueryData::Detail),
        QueryKey::AgentStats(id) => api.agent_stats(id).await.map(QueryData::AgentStats),
        QueryKey::History(id, range) => api.history(id, *range).await.map(QueryData::History),
    }
}
