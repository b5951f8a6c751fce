//! Core node types for simulated monitoring.

use alloc::string::String;
use alloc::vec::Vec;

use crate::UnixMillis;

/// Maximum number of ping samples retained per node.
pub const MAX_HISTORY: usize = 30;

/// Health status of a monitored node.
///
/// A node starts `Pending` until its first probe, then moves between
/// `Online` and `Offline`. `Pending` is never re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NodeStatus {
    /// Not yet probed.
    Pending,
    /// Last probe succeeded.
    Online,
    /// Last probe failed.
    Offline,
}

impl NodeStatus {
    /// Lowercase label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Pending => "pending",
            NodeStatus::Online => "online",
            NodeStatus::Offline => "offline",
        }
    }

    /// Parse the lowercase label back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(NodeStatus::Pending),
            "online" => Some(NodeStatus::Online),
            "offline" => Some(NodeStatus::Offline),
            _ => None,
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, NodeStatus::Online)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, NodeStatus::Pending)
    }
}

impl core::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One probe sample in a node's history.
///
/// `time` is a display label captured once per tick, so samples taken for
/// different nodes in the same tick carry identical labels.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PingSample {
    /// Shared display label for the tick this sample was taken in.
    pub time: String,
    /// Round-trip latency in milliseconds; `None` while offline.
    pub latency: Option<u32>,
}

/// A monitored synthetic endpoint with identity, address and derived
/// health metrics.
///
/// Invariants maintained by the engine:
/// - `uptime` is within `[0, 100]`
/// - `total_uptime_seconds >= 0` and excludes the currently-open online interval
/// - `ping_history` holds at most [`MAX_HISTORY`] samples, newest first
/// - `latency` is `Some` iff `status` is `Online`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Opaque unique identifier.
    pub id: String,
    /// User-friendly name.
    pub display_name: String,
    /// Address being "monitored" (IP or domain).
    pub address: String,
    /// Instant this node was added; monitored lifetime starts here.
    pub created_at: UnixMillis,
    pub status: NodeStatus,
    /// Latency of the most recent probe, when online.
    pub latency: Option<u32>,
    /// Recent samples, newest first.
    pub ping_history: Vec<PingSample>,
    /// Percentage of monitored lifetime spent online.
    pub uptime: f64,
    /// Cumulative online seconds across closed intervals.
    pub total_uptime_seconds: f64,
    /// Instant of the most recent status transition.
    pub last_status_change: UnixMillis,
}

impl Node {
    /// Create a node in its initial `Pending` state with empty history,
    /// zero accumulated uptime and a nominal 100% uptime figure.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        address: impl Into<String>,
        created_at: UnixMillis,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            address: address.into(),
            created_at,
            status: NodeStatus::Pending,
            latency: None,
            ping_history: Vec::new(),
            uptime: 100.0,
            total_uptime_seconds: 0.0,
            last_status_change: created_at,
        }
    }

    /// Prepend a sample and truncate the history to [`MAX_HISTORY`].
    pub fn push_sample(&mut self, sample: PingSample) {
        self.ping_history.insert(0, sample);
        self.ping_history.truncate(MAX_HISTORY);
    }

    pub fn is_online(&self) -> bool {
        self.status.is_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    fn sample(label: &str) -> PingSample {
        PingSample {
            time: String::from(label),
            latency: Some(42),
        }
    }

    #[test]
    fn new_node_starts_pending() {
        let created = UnixMillis::from_secs(1_000);
        let node = Node::new("id-1", "Google", "google.com", created);

        assert_eq!(node.status, NodeStatus::Pending);
        assert!(node.ping_history.is_empty());
        assert_eq!(node.latency, None);
        assert_eq!(node.uptime, 100.0);
        assert_eq!(node.total_uptime_seconds, 0.0);
        assert_eq!(node.last_status_change, created);
    }

    #[test]
    fn push_sample_is_newest_first() {
        let mut node = Node::new("id", "n", "n.test", UnixMillis::default());
        node.push_sample(sample("10:00:01"));
        node.push_sample(sample("10:00:02"));

        assert_eq!(node.ping_history[0].time, "10:00:02");
        assert_eq!(node.ping_history[1].time, "10:00:01");
    }

    #[test]
    fn push_sample_bounds_history() {
        let mut node = Node::new("id", "n", "n.test", UnixMillis::default());
        for i in 0..MAX_HISTORY + 10 {
            node.push_sample(sample(&format!("t{i}")));
        }

        assert_eq!(node.ping_history.len(), MAX_HISTORY);
        // The newest sample survives at the front, the oldest were dropped
        assert_eq!(node.ping_history[0].time, format!("t{}", MAX_HISTORY + 9));
        assert_eq!(
            node.ping_history[MAX_HISTORY - 1].time,
            format!("t{}", 10)
        );
    }

    #[test]
    fn status_labels_round_trip() {
        for status in [NodeStatus::Pending, NodeStatus::Online, NodeStatus::Offline] {
            assert_eq!(NodeStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(NodeStatus::parse("degraded"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&NodeStatus::Online).unwrap();
        assert_eq!(json, "\"online\"");
        let parsed: NodeStatus = serde_json::from_str("\"offline\"").unwrap();
        assert_eq!(parsed, NodeStatus::Offline);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn node_serde_round_trip() {
        let mut node = Node::new("id-9", "GitHub API", "api.github.com", UnixMillis::from_secs(5));
        node.status = NodeStatus::Online;
        node.latency = Some(120);
        node.push_sample(sample("12:00:00"));

        let json = serde_json::to_string(&node).unwrap();
        let parsed: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, node);
    }
}
