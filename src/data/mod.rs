//! Presentation logic for monitor history.
//!
//! ## Submodules
//!
//! - [`chart`]: Pivoting labeled series into timestamp rows and per-agent lines
//! - [`filter`]: Time-range and agent selection state
//! - [`format`]: Response time, timestamp and certificate formatting
//!
//! ## Data Flow
//!
//! ```text
//! MetricsResponse (history JSON)
//!        │
//!        ▼
//! group_series(series, &AgentFilter)
//!        │
//!        ▼
//! ChartData { rows, series, bounds } ──▶ ui::chart
//! ```

pub mod chart;
pub mod filter;
pub mod format;

pub use chart::{agent_key, group_series, AgentSeries, ChartData, ChartRow};
pub use filter::{available_agents, AgentFilter, AvailableAgent, ChartFilter, FilterChange};
pub use format::{format_cert_days, format_datetime, format_response_time, format_time_label};
