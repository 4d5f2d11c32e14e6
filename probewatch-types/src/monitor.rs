//! Monitor and per-agent observation types.

use alloc::string::String;

/// Value shown in place of a target the monitor owner chose not to publish.
pub const MASKED_TARGET: &str = "******";

/// Health of a monitor or of a single agent's last check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MonitorStatus {
    /// Last check succeeded.
    Up,
    /// Last check failed.
    Down,
    /// No data yet, or a status this client does not know about.
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl MonitorStatus {
    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            MonitorStatus::Up => "Up",
            MonitorStatus::Down => "Down",
            MonitorStatus::Unknown => "Unknown",
        }
    }

    /// Symbol for compact table cells.
    pub fn symbol(&self) -> &'static str {
        match self {
            MonitorStatus::Up => "●",
            MonitorStatus::Down => "✗",
            MonitorStatus::Unknown => "○",
        }
    }
}

/// Kind of check a monitor performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MonitorKind {
    Http,
    Https,
    Tcp,
    Icmp,
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl MonitorKind {
    /// Upper-case label, e.g. `HTTPS`.
    pub fn label(&self) -> &'static str {
        match self {
            MonitorKind::Http => "HTTP",
            MonitorKind::Https => "HTTPS",
            MonitorKind::Tcp => "TCP",
            MonitorKind::Icmp => "ICMP",
            MonitorKind::Unknown => "?",
        }
    }

    /// Only HTTPS monitors carry certificate information.
    pub fn has_certificate(&self) -> bool {
        matches!(self, MonitorKind::Https)
    }
}

/// Certificate expiry observed by a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertInfo {
    /// Expiry as a Unix timestamp in milliseconds.
    pub expiry_time: i64,
    /// Days remaining as reported by the backend.
    pub days_left: Option<i64>,
}

/// Aggregate view of a monitor across all of its agents.
///
/// A read-only snapshot; the client only ever replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PublicMonitor {
    pub id: String,
    pub name: String,

    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub kind: MonitorKind,

    #[cfg_attr(feature = "serde", serde(default))]
    pub target: String,

    /// When false the target must be shown masked.
    #[cfg_attr(feature = "serde", serde(default))]
    pub show_target_public: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub status: MonitorStatus,

    /// Average response time across agents, in milliseconds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub response_time: f64,

    /// Slowest agent response time, in milliseconds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub response_time_max: f64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub agent_count: u32,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub cert_expiry_time: Option<i64>,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub cert_days_left: Option<i64>,
}

impl PublicMonitor {
    /// The target, or [`MASKED_TARGET`] when it is not public.
    pub fn display_target(&self) -> &str {
        if self.show_target_public {
            &self.target
        } else {
            MASKED_TARGET
        }
    }

    /// Certificate details, only for HTTPS monitors that reported an expiry.
    pub fn cert(&self) -> Option<CertInfo> {
        if !self.kind.has_certificate() {
            return None;
        }
        self.cert_expiry_time.map(|expiry_time| CertInfo {
            expiry_time,
            days_left: self.cert_days_left,
        })
    }
}

/// One agent's latest observation of a monitor.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AgentMonitorStat {
    pub agent_id: String,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub agent_name: Option<String>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub status: MonitorStatus,

    /// Response time in milliseconds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub response_time: f64,

    /// Last check as a Unix timestamp in milliseconds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub checked_at: i64,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub cert_expiry_time: Option<i64>,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub cert_days_left: Option<i64>,

    /// Failure message from the last check.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub message: Option<String>,
}

impl AgentMonitorStat {
    /// First eight characters of the agent id.
    pub fn short_id(&self) -> &str {
        short_id(&self.agent_id)
    }

    /// Agent name when set, otherwise the short id.
    pub fn label(&self) -> &str {
        match self.agent_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.short_id(),
        }
    }

    /// Failure message worth showing: only for agents that are down.
    pub fn failure(&self) -> Option<&str> {
        match (self.status, self.message.as_deref()) {
            (MonitorStatus::Down, Some(msg)) if !msg.is_empty() => Some(msg),
            _ => None,
        }
    }

    /// Certificate details reported by this agent, if any.
    pub fn cert(&self) -> Option<CertInfo> {
        self.cert_expiry_time.map(|expiry_time| CertInfo {
            expiry_time,
            days_left: self.cert_days_left,
        })
    }
}

/// First eight characters of an id, respecting char boundaries.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
