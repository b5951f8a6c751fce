//! Activity recording for status transitions.

use nodewatch_types::{ActivityLogEntry, Node, NodeStatus, UnixMillis};
use uuid::Uuid;

/// Build the log entry for a closed interval.
///
/// Callers invoke this only when the accumulator reported a genuine
/// transition (the initial pending observation never closes an interval,
/// so it can never be logged). `status` is the NEW status reached;
/// `duration_seconds` is the length of the state just exited.
pub fn record_transition(
    node: &Node,
    status: NodeStatus,
    duration_seconds: f64,
    now: UnixMillis,
) -> ActivityLogEntry {
    ActivityLogEntry {
        id: Uuid::new_v4().to_string(),
        node_id: node.id.clone(),
        node_display_name: node.display_name.clone(),
        node_address: node.address.clone(),
        status,
        timestamp: now,
        duration_seconds,
    }
}
