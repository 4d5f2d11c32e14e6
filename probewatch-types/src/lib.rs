//! # probewatch-types
//!
//! Core types for the public monitor API consumed by probewatch. This crate
//! defines the wire schema of uptime monitors, per-agent observations and
//! the labeled time-series returned by the history endpoint.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to (de)serialize the
//!   camelCase JSON the backend speaks
//! - **Tolerant decoding**: Unknown statuses and monitor types decode to an
//!   `Unknown` variant instead of failing the whole response
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use probewatch_types::{MetricDataPoint, MetricSeries, TimeRange};
//!
//! let series = MetricSeries::new("response_time")
//!     .with_label("agent_id", "a1")
//!     .with_point(MetricDataPoint::new(100, 20.0))
//!     .with_point(MetricDataPoint::new(200, 25.0));
//!
//! assert_eq!(series.agent_id(), Some("a1"));
//! assert_eq!(series.data.len(), 2);
//! assert_eq!(TimeRange::default().as_str(), "1d");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod metrics;
mod monitor;
mod range;

pub use metrics::*;
pub use monitor::*;
pub use range::*;
