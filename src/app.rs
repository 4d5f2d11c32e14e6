//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use probewatch_types::{AgentMonitorStat, MetricsResponse, PublicMonitor, TimeRange};
use ratatui::style::Color;
use tracing::{debug, info};

use crate::data::{
    available_agents, AgentFilter, AvailableAgent, ChartData, ChartFilter, FilterChange,
};
use crate::export::ChartExport;
use crate::source::{Fetcher, QueryCache, QueryKey};
use crate::ui::palette::{color_for_agent, ColorMode};
use crate::ui::Theme;

/// The current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Table of public monitors.
    MonitorList,
    /// Hero section, chart and agent table of one monitor.
    MonitorDetail,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::MonitorList => "Monitors",
            View::MonitorDetail => "Detail",
        }
    }
}

/// What the detail view can show for the current monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailState<'a> {
    /// No monitor id; nothing was requested.
    MissingId,
    /// First fetch still running.
    Loading,
    /// Fetch failed and nothing is cached.
    Failed(&'a str),
    Ready(&'a PublicMonitor),
}

/// Startup options for [`App`].
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub poll_interval: Duration,
    pub default_range: TimeRange,
    pub color_mode: ColorMode,
    /// Shown in the header.
    pub endpoint: String,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            default_range: TimeRange::default(),
            color_mode: ColorMode::default(),
            endpoint: String::new(),
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub view: View,
    pub show_help: bool,

    fetcher: Fetcher,
    pub cache: QueryCache,
    pub endpoint: String,

    /// Monitor shown in the detail view; `None` when the id was missing.
    pub monitor_id: Option<String>,
    pub filter: ChartFilter,
    pub color_mode: ColorMode,
    default_range: TimeRange,

    pub selected_index: usize,

    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(fetcher: Fetcher, options: AppOptions) -> Self {
        Self::with_theme(fetcher, options, Theme::auto_detect())
    }

    pub fn with_theme(fetcher: Fetcher, options: AppOptions, theme: Theme) -> Self {
        Self {
            running: true,
            view: View::MonitorList,
            show_help: false,
            fetcher,
            cache: QueryCache::new(options.poll_interval),
            endpoint: options.endpoint,
            monitor_id: None,
            filter: ChartFilter::new(options.default_range),
            color_mode: options.color_mode,
            default_range: options.default_range,
            selected_index: 0,
            theme,
            status_message: None,
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Keys the current view needs.
    pub fn active_keys(&self) -> Vec<QueryKey> {
        match self.view {
            View::MonitorList => vec![QueryKey::MonitorList],
            View::MonitorDetail => match &self.monitor_id {
                Some(id) => vec![
                    QueryKey::MonitorDetail(id.clone()),
                    QueryKey::AgentStats(id.clone()),
                    self.history_key_for(id),
                ],
                None => Vec::new(),
            },
        }
    }

    fn history_key_for(&self, id: &str) -> QueryKey {
        QueryKey::History(id.to_string(), self.filter.time_range)
    }

    /// History key for the current monitor and range.
    pub fn history_key(&self) -> Option<QueryKey> {
        self.monitor_id.as_deref().map(|id| self.history_key_for(id))
    }

    /// Apply finished fetches, start due ones and reconcile the agent filter.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        for result in self.fetcher.drain() {
            let key = result.key.clone();
            if !self.cache.apply(result, now) {
                debug!(%key, "discarded out-of-order response");
            }
        }

        for key in self.active_keys() {
            if self.cache.is_due(&key, now) {
                let seq = self.cache.begin(&key, now);
                self.fetcher.spawn(key, seq);
            }
        }

        if self.view == View::MonitorList {
            self.clamp_selection();
        }

        // Only reconcile against a stats list that has actually loaded
        let loaded = self
            .monitor_id
            .as_deref()
            .is_some_and(|id| self.cache.agent_stats(id).is_some());
        let available = self.available_agents();
        if loaded && self.filter.reconcile(&available) {
            debug!("selected agent no longer reported, showing all agents");
        }
    }

    // Monitor list

    pub fn monitors(&self) -> &[PublicMonitor] {
        self.cache.monitors().unwrap_or_default()
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_next_n(&mut self, n: usize) {
        let max = self.monitors().len().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.monitors().len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.monitors().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    /// Open the monitor under the cursor.
    pub fn enter_detail(&mut self) {
        let id = self.monitors().get(self.selected_index).map(|m| m.id.clone());
        if let Some(id) = id {
            self.open_monitor(&id);
        }
    }

    // Detail view

    /// Show the detail view for `id`.
    ///
    /// A blank id leaves the view in its empty state without issuing any
    /// request. Opening a different monitor resets the agent selection and
    /// keeps the time range.
    pub fn open_monitor(&mut self, id: &str) {
        self.view = View::MonitorDetail;
        let id = id.trim();
        if id.is_empty() {
            self.monitor_id = None;
            return;
        }
        if self.monitor_id.as_deref() != Some(id) {
            info!(monitor = id, "opening monitor");
            self.monitor_id = Some(id.to_string());
            self.filter.selected_agent = AgentFilter::All;
        }
    }

    /// Return to the list; from the list, quit.
    pub fn go_back(&mut self) {
        match self.view {
            View::MonitorDetail => self.view = View::MonitorList,
            View::MonitorList => {}
        }
    }

    pub fn detail_state(&self) -> DetailState<'_> {
        let Some(id) = self.monitor_id.as_deref() else {
            return DetailState::MissingId;
        };
        if let Some(monitor) = self.cache.detail(id) {
            return DetailState::Ready(monitor);
        }
        match self.cache.error(&QueryKey::MonitorDetail(id.to_string())) {
            Some(err) => DetailState::Failed(err),
            None => DetailState::Loading,
        }
    }

    pub fn agent_stats(&self) -> &[AgentMonitorStat] {
        self.monitor_id
            .as_deref()
            .and_then(|id| self.cache.agent_stats(id))
            .unwrap_or_default()
    }

    pub fn available_agents(&self) -> Vec<AvailableAgent> {
        available_agents(self.agent_stats())
    }

    pub fn history(&self) -> Option<&MetricsResponse> {
        self.history_key().and_then(|key| self.cache.history(&key))
    }

    /// Chart rows and lines for the current selection.
    pub fn chart_data(&self) -> ChartData {
        self.history()
            .map(|h| ChartData::build(&h.series, &self.filter.selected_agent))
            .unwrap_or_default()
    }

    /// Color of `agent_id` in both the chart and the agent table.
    pub fn agent_color(&self, agent_id: &str) -> Color {
        let ids = self.agent_stats().iter().map(|s| s.agent_id.as_str());
        color_for_agent(agent_id, ids, self.color_mode)
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        if self.filter.set_time_range(range) == FilterChange::Refetch {
            debug!(range = %range, "time range changed");
        }
    }

    pub fn next_time_range(&mut self) {
        self.set_time_range(self.filter.time_range.next());
    }

    pub fn prev_time_range(&mut self) {
        self.set_time_range(self.filter.time_range.prev());
    }

    pub fn next_agent(&mut self) {
        let available = self.available_agents();
        self.filter.next_agent(&available);
    }

    pub fn prev_agent(&mut self) {
        let available = self.available_agents();
        self.filter.prev_agent(&available);
    }

    pub fn select_all_agents(&mut self) {
        self.filter.selected_agent = AgentFilter::All;
    }

    /// Label of the current agent selection.
    pub fn agent_filter_label(&self) -> String {
        match &self.filter.selected_agent {
            AgentFilter::All => "All agents".to_string(),
            AgentFilter::Agent(id) => self
                .available_agents()
                .into_iter()
                .find(|a| &a.id == id)
                .map_or_else(|| id.clone(), |a| a.label),
        }
    }

    /// Refetch everything the current view shows.
    pub fn refresh(&mut self) {
        for key in self.active_keys() {
            self.cache.invalidate(&key);
        }
        self.set_status_message("Refreshing...".to_string());
    }

    /// Range the app started with.
    pub fn default_range(&self) -> TimeRange {
        self.default_range
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current chart to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(id) = self.monitor_id.as_deref() else {
            anyhow::bail!("No monitor selected");
        };
        let history = self.history();
        if history.is_none() {
            anyhow::bail!("No history loaded yet");
        }

        ChartExport::new(
            id,
            self.cache.detail(id),
            self.agent_stats(),
            history,
            &self.filter,
            self.color_mode,
        )
        .write_to(path)
    }
}
