//! Activity log entries recording node status transitions.

use alloc::string::String;

use crate::{NodeStatus, UnixMillis};

/// An immutable record of a single status transition.
///
/// Created only for a genuine `Online` <-> `Offline` transition; the initial
/// observation of a `Pending` node is never logged. The node reference is
/// weak: the node may be removed later while its entries persist.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityLogEntry {
    /// Unique identifier of this entry.
    pub id: String,
    /// Id of the node this entry refers to (informational only).
    pub node_id: String,
    /// Display name of the node at the time of the transition.
    pub node_display_name: String,
    /// Address of the node at the time of the transition.
    pub node_address: String,
    /// The NEW status reached by the transition (`Online` or `Offline`).
    pub status: NodeStatus,
    /// Instant the transition was observed.
    pub timestamp: UnixMillis,
    /// Length in seconds of the state the node just exited.
    pub duration_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_is_plain_data() {
        let entry = ActivityLogEntry {
            id: String::from("e1"),
            node_id: String::from("n1"),
            node_display_name: String::from("Google"),
            node_address: String::from("google.com"),
            status: NodeStatus::Offline,
            timestamp: UnixMillis::from_secs(100),
            duration_seconds: 12.5,
        };

        let copy = entry.clone();
        assert_eq!(copy, entry);
        assert_eq!(copy.status, NodeStatus::Offline);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn entry_serde_round_trip() {
        let entry = ActivityLogEntry {
            id: String::from("e2"),
            node_id: String::from("n2"),
            node_display_name: String::from("Cloudflare DNS"),
            node_address: String::from("1.1.1.1"),
            status: NodeStatus::Online,
            timestamp: UnixMillis::from_millis(123_456),
            duration_seconds: 3.25,
        };

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: ActivityLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
