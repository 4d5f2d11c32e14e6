//! # probewatch-client
//!
//! Async client for the public monitor REST API.
//!
//! The client is read-only apart from the session lifecycle: it fetches the
//! monitor list, a monitor's aggregate detail, its per-agent statistics and
//! its labeled response-time history. Authentication state lives in an
//! explicit [`Session`] handed to the client at construction, so no global
//! token storage is involved.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use probewatch_client::{ApiClient, MonitorApi, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::anonymous();
//!     let client = ApiClient::builder()
//!         .endpoint("http://localhost:8080")
//!         .session(session.clone())
//!         .build()?;
//!
//!     client.login("admin", "secret").await?;
//!     let monitors = client.list_monitors().await?;
//!     println!("{} monitors", monitors.len());
//!
//!     client.logout();
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

pub mod client;
pub mod error;
pub mod session;

pub use client::{ApiClient, ApiClientBuilder};
pub use error::ClientError;
pub use session::{Session, UserInfo};

// Re-export types for convenience
pub use probewatch_types::{
    AgentMonitorStat, MetricDataPoint, MetricSeries, MetricsResponse, PublicMonitor, TimeRange,
};

/// Read operations against the monitor API.
///
/// [`ApiClient`] is the HTTP implementation; the dashboard only depends on
/// this trait so it can be driven by an in-memory implementation in tests.
#[async_trait]
pub trait MonitorApi: Send + Sync + std::fmt::Debug {
    /// All public monitors.
    async fn list_monitors(&self) -> Result<Vec<PublicMonitor>, ClientError>;

    /// Aggregate detail of one monitor.
    async fn monitor(&self, id: &str) -> Result<PublicMonitor, ClientError>;

    /// Latest observation per agent, in the backend's order.
    async fn agent_stats(&self, id: &str) -> Result<Vec<AgentMonitorStat>, ClientError>;

    /// Labeled time-series for the given window.
    async fn history(&self, id: &str, range: TimeRange) -> Result<MetricsResponse, ClientError>;
}
