//! Parameter-keyed query cache with stale-while-revalidate semantics.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use probewatch_types::{AgentMonitorStat, MetricsResponse, PublicMonitor};

use super::{FetchResult, QueryData, QueryKey};

/// Cached state of one query.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    /// Last successful payload. Kept when a later fetch fails.
    pub data: Option<QueryData>,
    /// When `data` was last replaced.
    pub updated_at: Option<Instant>,
    /// When the last request for this key was started.
    pub last_attempt: Option<Instant>,
    /// Error of the last attempt; cleared by the next success.
    pub error: Option<String>,
    pub in_flight: bool,
    /// Highest sequence number applied so far.
    applied_seq: u64,
    /// Set by invalidation; forces the next tick to refetch.
    stale: bool,
}

/// All queries the dashboard knows about.
#[derive(Debug)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    poll_interval: Duration,
    next_seq: u64,
}

impl QueryCache {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            poll_interval,
            next_seq: 0,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Whether `key` should be fetched at `now`.
    ///
    /// A key is never due while a request for it is in flight. Polling keys
    /// are due once the interval has passed since the last attempt. History
    /// keys are due on first sight, after invalidation, or when nothing was
    /// ever cached and the interval has passed since a failed attempt.
    pub fn is_due(&self, key: &QueryKey, now: Instant) -> bool {
        let Some(entry) = self.entries.get(key) else {
            return true;
        };
        if entry.in_flight {
            return false;
        }
        if entry.stale {
            return true;
        }
        let elapsed = entry
            .last_attempt
            .map_or(true, |at| now.saturating_duration_since(at) >= self.poll_interval);

        if key.polls() {
            elapsed
        } else {
            entry.data.is_none() && elapsed
        }
    }

    /// Mark `key` as in flight and return the sequence number for its request.
    pub fn begin(&mut self, key: &QueryKey, now: Instant) -> u64 {
        self.next_seq += 1;
        let entry = self.entries.entry(key.clone()).or_default();
        entry.in_flight = true;
        entry.stale = false;
        entry.last_attempt = Some(now);
        self.next_seq
    }

    /// Apply a completed fetch.
    ///
    /// Returns false when the result was older than one already applied and
    /// has been discarded.
    pub fn apply(&mut self, result: FetchResult, now: Instant) -> bool {
        let entry = self.entries.entry(result.key).or_default();
        if result.seq <= entry.applied_seq {
            return false;
        }
        entry.applied_seq = result.seq;
        entry.in_flight = false;

        match result.outcome {
            Ok(data) => {
                entry.data = Some(data);
                entry.updated_at = Some(now);
                entry.error = None;
            }
            Err(err) => {
                entry.error = Some(err);
            }
        }
        true
    }

    /// Force `key` to be refetched on the next tick.
    pub fn invalidate(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
    }

    /// Force every cached key to be refetched.
    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.stale = true;
        }
    }

    pub fn entry(&self, key: &QueryKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// True while a request is running and nothing is cached yet.
    pub fn is_loading(&self, key: &QueryKey) -> bool {
        self.entries
            .get(key)
            .map_or(true, |e| e.data.is_none() && e.error.is_none())
    }

    /// Error of the last attempt, if it failed.
    pub fn error(&self, key: &QueryKey) -> Option<&str> {
        self.entries.get(key).and_then(|e| e.error.as_deref())
    }

    /// Age of the cached value.
    pub fn age(&self, key: &QueryKey, now: Instant) -> Option<Duration> {
        let updated = self.entries.get(key)?.updated_at?;
        Some(now.saturating_duration_since(updated))
    }

    fn data(&self, key: &QueryKey) -> Option<&QueryData> {
        self.entries.get(key).and_then(|e| e.data.as_ref())
    }

    pub fn monitors(&self) -> Option<&[PublicMonitor]> {
        match self.data(&QueryKey::MonitorList) {
            Some(QueryData::Monitors(list)) => Some(list),
            _ => None,
        }
    }

    pub fn detail(&self, id: &str) -> Option<&PublicMonitor> {
        match self.data(&QueryKey::MonitorDetail(id.to_string())) {
            Some(QueryData::Detail(monitor)) => Some(monitor),
            _ => None,
        }
    }

    pub fn agent_stats(&self, id: &str) -> Option<&[AgentMonitorStat]> {
        match self.data(&QueryKey::AgentStats(id.to_string())) {
            Some(QueryData::AgentStats(stats)) => Some(stats),
            _ => None,
        }
    }

    pub fn history(&self, key: &QueryKey) -> Option<&MetricsResponse> {
        match self.data(key) {
            Some(QueryData::History(history)) => Some(history),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probewatch_types::TimeRange;

    const POLL: Duration = Duration::from_secs(30);

    fn detail_key() -> QueryKey {
        QueryKey::MonitorDetail("m1".into())
    }

    fn ok(key: &QueryKey, seq: u64, name: &str) -> FetchResult {
        FetchResult {
            key: key.clone(),
            seq,
            outcome: Ok(QueryData::Detail(PublicMonitor {
                id: "m1".into(),
                name: name.into(),
                ..Default::default()
            })),
        }
    }

    fn failed(key: &QueryKey, seq: u64) -> FetchResult {
        FetchResult {
            key: key.clone(),
            seq,
            outcome: Err("connection refused".into()),
        }
    }

    #[test]
    fn test_new_key_is_due() {
        let cache = QueryCache::new(POLL);
        assert!(cache.is_due(&detail_key(), Instant::now()));
        assert!(cache.is_loading(&detail_key()));
    }

    #[test]
    fn test_in_flight_key_not_due() {
        let mut cache = QueryCache::new(POLL);
        let now = Instant::now();
        cache.begin(&detail_key(), now);
        assert!(!cache.is_due(&detail_key(), now + POLL * 2));
    }

    #[test]
    fn test_polling_key_due_after_interval() {
        let mut cache = QueryCache::new(POLL);
        let key = detail_key();
        let now = Instant::now();
        let seq = cache.begin(&key, now);
        cache.apply(ok(&key, seq, "a"), now);

        assert!(!cache.is_due(&key, now + Duration::from_secs(10)));
        assert!(cache.is_due(&key, now + POLL));
    }

    #[test]
    fn test_history_not_repolled() {
        let mut cache = QueryCache::new(POLL);
        let key = QueryKey::History("m1".into(), TimeRange::OneDay);
        let now = Instant::now();
        let seq = cache.begin(&key, now);
        cache.apply(
            FetchResult {
                key: key.clone(),
                seq,
                outcome: Ok(QueryData::History(MetricsResponse::default())),
            },
            now,
        );

        assert!(!cache.is_due(&key, now + POLL * 10));

        cache.invalidate(&key);
        assert!(cache.is_due(&key, now));
    }

    #[test]
    fn test_failure_keeps_cached_value() {
        let mut cache = QueryCache::new(POLL);
        let key = detail_key();
        let now = Instant::now();

        let seq = cache.begin(&key, now);
        cache.apply(ok(&key, seq, "first"), now);

        let seq = cache.begin(&key, now);
        cache.apply(failed(&key, seq), now);

        assert_eq!(cache.detail("m1").map(|m| m.name.as_str()), Some("first"));
        assert_eq!(cache.error(&key), Some("connection refused"));
        assert!(!cache.is_loading(&key));

        let seq = cache.begin(&key, now);
        cache.apply(ok(&key, seq, "second"), now);
        assert!(cache.error(&key).is_none());
        assert_eq!(cache.detail("m1").map(|m| m.name.as_str()), Some("second"));
    }

    #[test]
    fn test_stale_sequence_discarded() {
        let mut cache = QueryCache::new(POLL);
        let key = detail_key();
        let now = Instant::now();

        let old = cache.begin(&key, now);
        let new = cache.begin(&key, now);

        assert!(cache.apply(ok(&key, new, "new"), now));
        assert!(!cache.apply(ok(&key, old, "old"), now));
        assert_eq!(cache.detail("m1").map(|m| m.name.as_str()), Some("new"));
    }

    #[test]
    fn test_history_retried_only_when_empty() {
        let mut cache = QueryCache::new(POLL);
        let key = QueryKey::History("m1".into(), TimeRange::OneHour);
        let now = Instant::now();

        let seq = cache.begin(&key, now);
        cache.apply(failed(&key, seq), now);

        assert!(!cache.is_due(&key, now + Duration::from_secs(1)));
        assert!(cache.is_due(&key, now + POLL));
    }

    #[test]
    fn test_invalidate_during_flight_refetches_after() {
        let mut cache = QueryCache::new(POLL);
        let key = detail_key();
        let now = Instant::now();

        let seq = cache.begin(&key, now);
        cache.invalidate_all();
        assert!(!cache.is_due(&key, now));

        cache.apply(ok(&key, seq, "a"), now);
        assert!(cache.is_due(&key, now));
    }

    #[test]
    fn test_age() {
        let mut cache = QueryCache::new(POLL);
        let key = detail_key();
        let now = Instant::now();
        assert!(cache.age(&key, now).is_none());

        let seq = cache.begin(&key, now);
        cache.apply(ok(&key, seq, "a"), now);
        assert_eq!(
            cache.age(&key, now + Duration::from_secs(4)),
            Some(Duration::from_secs(4))
        );
    }
}
