//! # probewatch
//!
//! A terminal dashboard for public uptime monitors and the response times
//! reported by each probing agent.
//!
//! The crate fetches monitors from the monitor REST API, keeps them in a
//! parameter-keyed query cache, reshapes per-agent history series into
//! timestamp rows and draws them as a multi-series chart.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (grouping)    │(ratatui)│    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐    ┌──────────────────┐                        │
//! │  │ source  │───▶│ probewatch-client │──▶ REST API            │
//! │  │ (cache) │    └──────────────────┘                        │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation and the chart filter
//! - **[`source`]**: [`QueryKey`]-addressed cache and background [`Fetcher`]
//! - **[`data`]**: Series grouping, filter state machine, formatting
//! - **[`ui`]**: Monitor list, detail view, chart and agent palette
//! - **[`config`]** / **[`logging`]**: Layered settings and tracing setup
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Browse all public monitors
//! probewatch --url https://status.example.com
//!
//! # Open one monitor with a 6 hour window
//! probewatch --url https://status.example.com --monitor m1 --range 6h
//!
//! # Write the chart as JSON and exit
//! probewatch --monitor m1 --export chart.json
//! ```
//!
//! ### Grouping history as a library
//!
//! ```
//! use probewatch::data::{group_series, AgentFilter};
//! use probewatch_types::{MetricDataPoint, MetricSeries};
//!
//! let series = vec![
//!     MetricSeries::new("response_time")
//!         .with_label("agent_id", "a1")
//!         .with_point(MetricDataPoint::new(100, 10.0)),
//!     MetricSeries::new("response_time")
//!         .with_label("agent_id", "a2")
//!         .with_point(MetricDataPoint::new(100, 15.0)),
//! ];
//!
//! let rows = group_series(&series, &AgentFilter::All);
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].value("a2"), Some(15.0));
//! ```
//!
//! ### Driving the app
//!
//! ```no_run
//! use std::sync::Arc;
//! use probewatch::{ApiClient, App, AppOptions, Fetcher};
//!
//! # tokio_test::block_on(async {
//! let client = ApiClient::builder().endpoint("http://localhost:8080").build().unwrap();
//! let mut app = App::new(Fetcher::current(Arc::new(client)), AppOptions::default());
//! app.open_monitor("m1");
//! app.tick();
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod export;
pub mod logging;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, AppOptions, DetailState, View};
pub use data::{AgentFilter, ChartData, ChartFilter, ChartRow};
pub use export::ChartExport;
pub use probewatch_client::{ApiClient, ClientError, Session};
pub use source::{Fetcher, QueryCache, QueryKey};
pub use ui::{ColorMode, Theme};
