//! Time-range and agent selection for the detail chart.
//!
//! The selection is a small state machine: changing the range needs a new
//! history fetch, changing the agent only regroups data already in the cache,
//! and a selected agent that disappears from the stats list falls back to
//! "all".

use std::fmt;

use probewatch_types::{AgentMonitorStat, TimeRange};

/// Agent selection in the chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AgentFilter {
    /// Show every agent.
    #[default]
    All,
    /// Show a single agent by id.
    Agent(String),
}

impl AgentFilter {
    /// Whether a series labeled with `agent_id` passes this filter.
    ///
    /// Series without an `agent_id` label only pass the "all" filter.
    pub fn matches(&self, agent_id: Option<&str>) -> bool {
        match self {
            AgentFilter::All => true,
            AgentFilter::Agent(selected) => agent_id == Some(selected.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, AgentFilter::All)
    }

    /// The selected agent id, if any.
    pub fn agent_id(&self) -> Option<&str> {
        match self {
            AgentFilter::All => None,
            AgentFilter::Agent(id) => Some(id),
        }
    }
}

impl fmt::Display for AgentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentFilter::All => f.write_str("all"),
            AgentFilter::Agent(id) => f.write_str(id),
        }
    }
}

impl From<&str> for AgentFilter {
    fn from(s: &str) -> Self {
        if s.is_empty() || s == "all" {
            AgentFilter::All
        } else {
            AgentFilter::Agent(s.to_string())
        }
    }
}

/// An agent the user can pick, derived from the per-agent stats list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableAgent {
    pub id: String,
    pub label: String,
}

/// Agents offered by the selector, in stats order.
pub fn available_agents(stats: &[AgentMonitorStat]) -> Vec<AvailableAgent> {
    stats
        .iter()
        .map(|s| AvailableAgent {
            id: s.agent_id.clone(),
            label: s.label().to_string(),
        })
        .collect()
}

/// What the caller has to do after a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    /// Nothing changed.
    Unchanged,
    /// Agent changed: regroup cached history, no fetch.
    Regroup,
    /// Range changed: history for the new range must be fetched.
    Refetch,
}

/// Chart selection state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartFilter {
    pub time_range: TimeRange,
    pub selected_agent: AgentFilter,
}

impl ChartFilter {
    /// Start with the given range and all agents.
    pub fn new(time_range: TimeRange) -> Self {
        Self {
            time_range,
            selected_agent: AgentFilter::All,
        }
    }

    /// Select a time range. The agent selection is kept.
    pub fn set_time_range(&mut self, range: TimeRange) -> FilterChange {
        if self.time_range == range {
            return FilterChange::Unchanged;
        }
        self.time_range = range;
        FilterChange::Refetch
    }

    /// Select an agent. Ids not in `available` are ignored.
    pub fn select_agent(
        &mut self,
        agent: AgentFilter,
        available: &[AvailableAgent],
    ) -> FilterChange {
        if let AgentFilter::Agent(ref id) = agent {
            if !available.iter().any(|a| &a.id == id) {
                return FilterChange::Unchanged;
            }
        }
        if self.selected_agent == agent {
            return FilterChange::Unchanged;
        }
        self.selected_agent = agent;
        FilterChange::Regroup
    }

    /// Step forward through `all, agent 1, .., agent N`, wrapping to `all`.
    pub fn next_agent(&mut self, available: &[AvailableAgent]) -> FilterChange {
        let next = match self.position(available) {
            None => available.first(),
            Some(i) => available.get(i + 1),
        };
        let agent = next.map_or(AgentFilter::All, |a| AgentFilter::Agent(a.id.clone()));
        self.select_agent(agent, available)
    }

    /// Step backward through the same cycle as [`ChartFilter::next_agent`].
    pub fn prev_agent(&mut self, available: &[AvailableAgent]) -> FilterChange {
        let prev = match self.position(available) {
            None => available.last(),
            Some(0) => None,
            Some(i) => available.get(i - 1),
        };
        let agent = prev.map_or(AgentFilter::All, |a| AgentFilter::Agent(a.id.clone()));
        self.select_agent(agent, available)
    }

    /// Reset to "all" if the selected agent is no longer available.
    ///
    /// Returns true when a reset happened.
    pub fn reconcile(&mut self, available: &[AvailableAgent]) -> bool {
        let AgentFilter::Agent(ref id) = self.selected_agent else {
            return false;
        };
        if available.iter().any(|a| &a.id == id) {
            return false;
        }
        self.selected_agent = AgentFilter::All;
        true
    }

    fn position(&self, available: &[AvailableAgent]) -> Option<usize> {
        let id = self.selected_agent.agent_id()?;
        available.iter().position(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents(ids: &[&str]) -> Vec<AvailableAgent> {
        ids.iter()
            .map(|id| AvailableAgent {
                id: id.to_string(),
                label: id.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let filter = ChartFilter::default();
        assert_eq!(filter.time_range, TimeRange::OneDay);
        assert_eq!(filter.selected_agent, AgentFilter::All);
    }

    #[test]
    fn test_range_change_keeps_agent() {
        let available = agents(&["a1", "a2"]);
        let mut filter = ChartFilter::default();
        filter.select_agent(AgentFilter::from("a2"), &available);

        assert_eq!(filter.set_time_range(TimeRange::OneHour), FilterChange::Refetch);
        assert_eq!(filter.selected_agent, AgentFilter::Agent("a2".into()));
        assert_eq!(filter.set_time_range(TimeRange::OneHour), FilterChange::Unchanged);
    }

    #[test]
    fn test_agent_change_only_regroups() {
        let available = agents(&["a1"]);
        let mut filter = ChartFilter::default();
        assert_eq!(
            filter.select_agent(AgentFilter::from("a1"), &available),
            FilterChange::Regroup
        );
        assert_eq!(filter.time_range, TimeRange::OneDay);
        assert_eq!(
            filter.select_agent(AgentFilter::from("a1"), &available),
            FilterChange::Unchanged
        );
    }

    #[test]
    fn test_unknown_agent_ignored() {
        let available = agents(&["a1"]);
        let mut filter = ChartFilter::default();
        assert_eq!(
            filter.select_agent(AgentFilter::from("zz"), &available),
            FilterChange::Unchanged
        );
        assert!(filter.selected_agent.is_all());
    }

    #[test]
    fn test_reconcile_resets_missing_agent() {
        let mut filter = ChartFilter::default();
        filter.select_agent(AgentFilter::from("a2"), &agents(&["a1", "a2"]));

        assert!(!filter.reconcile(&agents(&["a1", "a2"])));
        assert_eq!(filter.selected_agent, AgentFilter::Agent("a2".into()));

        assert!(filter.reconcile(&agents(&["a1"])));
        assert_eq!(filter.selected_agent, AgentFilter::All);

        // "all" never needs reconciling
        assert!(!filter.reconcile(&[]));
    }

    #[test]
    fn test_agent_cycle() {
        let available = agents(&["a1", "a2"]);
        let mut filter = ChartFilter::default();

        filter.next_agent(&available);
        assert_eq!(filter.selected_agent.agent_id(), Some("a1"));
        filter.next_agent(&available);
        assert_eq!(filter.selected_agent.agent_id(), Some("a2"));
        filter.next_agent(&available);
        assert!(filter.selected_agent.is_all());

        filter.prev_agent(&available);
        assert_eq!(filter.selected_agent.agent_id(), Some("a2"));
        filter.prev_agent(&available);
        filter.prev_agent(&available);
        assert!(filter.selected_agent.is_all());
    }

    #[test]
    fn test_agent_cycle_with_no_agents() {
        let mut filter = ChartFilter::default();
        assert_eq!(filter.next_agent(&[]), FilterChange::Unchanged);
        assert!(filter.selected_agent.is_all());
    }

    #[test]
    fn test_agent_filter_matches() {
        assert!(AgentFilter::All.matches(None));
        assert!(AgentFilter::All.matches(Some("a1")));
        let only = AgentFilter::from("a1");
        assert!(only.matches(Some("a1")));
        assert!(!only.matches(Some("a2")));
        assert!(!only.matches(None));
        assert_eq!(AgentFilter::from("all"), AgentFilter::All);
    }

    #[test]
    fn test_available_agents_uses_labels() {
        let stats = vec![
            AgentMonitorStat {
                agent_id: "0123456789".into(),
                ..Default::default()
            },
            AgentMonitorStat {
                agent_id: "b".into(),
                agent_name: Some("berlin".into()),
                ..Default::default()
            },
        ];
        let available = available_agents(&stats);
        assert_eq!(available[0].label, "01234567");
        assert_eq!(available[1].label, "berlin");
        assert_eq!(available[1].id, "b");
    }
}
