//! Uptime accounting for a single node across one tick.
//!
//! The bookkeeping is deliberately dual: `total_uptime_seconds` only grows
//! when an online interval CLOSES (on a transition away from online), while
//! the uptime percentage also counts the currently-open online interval.
//! The open interval must never be persisted into the total - it would be
//! double-counted when the interval eventually closes.

use nodewatch_types::{Node, NodeStatus, UnixMillis};

/// The result of advancing a node's uptime state by one observed sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UptimeAdvance {
    /// Cumulative online seconds across closed intervals.
    pub total_uptime_seconds: f64,
    /// Instant of the most recent status transition after this sample.
    pub last_status_change: UnixMillis,
    /// Percentage of monitored lifetime spent online, in `[0, 100]`.
    pub uptime_percent: f64,
    /// Seconds spent in the state just exited, when this sample closed a
    /// genuine (non-pending) interval. `None` for the first observation
    /// and for same-status samples.
    pub closed_interval: Option<f64>,
}

/// Advance `node`'s uptime state given a new sampled `status` at `now`.
///
/// Elapsed time is clamped at zero against clock skew; the percentage is
/// capped at 100.
pub fn advance(node: &Node, status: NodeStatus, now: UnixMillis) -> UptimeAdvance {
    let mut total = node.total_uptime_seconds;
    let mut last_change = node.last_status_change;
    let mut closed_interval = None;

    if status != node.status && node.status != NodeStatus::Pending {
        // A genuine transition: close the interval the node is leaving.
        let elapsed = now.seconds_since(node.last_status_change);
        if node.status.is_online() {
            total += elapsed;
        }
        last_change = now;
        closed_interval = Some(elapsed);
    } else if node.status == NodeStatus::Pending {
        // First observation: there is no prior interval to close.
        last_change = now;
    }

    // The open online interval counts toward the percentage only.
    let mut live = total;
    if status.is_online() {
        live += now.seconds_since(last_change);
    }

    let monitored = now.seconds_since(node.created_at);
    let uptime_percent = if monitored > 0.0 {
        (live / monitored * 100.0).min(100.0)
    } else {
        100.0
    };

    UptimeAdvance {
        total_uptime_seconds: total,
        last_status_change: last_change,
        uptime_percent,
        closed_interval,
    }
}
