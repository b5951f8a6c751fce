//! The node registry: shared monitoring state and the single-writer tick.
//!
//! The registry owns the only two shared mutable collections in the
//! system - the tracked nodes and the activity log. Both are replaced
//! wholesale on each tick (copy-on-write), never mutated field-by-field,
//! so readers always observe a consistent snapshot. Lock order is nodes
//! before log everywhere both are held.

use chrono::DateTime;
use parking_lot::RwLock;
use uuid::Uuid;

use nodewatch_types::{
    ActivityLogEntry, Node, NodeStatus, PingSample, SessionSnapshot, UnixMillis,
};

use crate::activity;
use crate::config::DEFAULT_MAX_LOG_ENTRIES;
use crate::error::{Error, Result};
use crate::notify::Notification;
use crate::probe::Prober;
use crate::uptime;

/// Format the display time label shared by all samples in a tick.
///
/// UTC rather than local time, so labels are reproducible.
fn time_label(now: UnixMillis) -> String {
    DateTime::from_timestamp_millis(now.as_millis() as i64)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Shared monitoring state: the tracked nodes and the activity log.
///
/// The registry is the sole writer of both collections. Readers get cloned
/// snapshots; the scheduler drives [`Registry::tick_at`], which mutates
/// everything atomically under the write locks.
#[derive(Debug)]
pub struct Registry {
    nodes: RwLock<Vec<Node>>,
    log: RwLock<Vec<ActivityLogEntry>>,
    max_log_entries: Option<usize>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_LOG_ENTRIES))
    }
}

impl Registry {
    /// Create an empty registry with the given activity log cap
    /// (`None` disables eviction).
    pub fn new(max_log_entries: Option<usize>) -> Self {
        Self {
            nodes: RwLock::new(Vec::new()),
            log: RwLock::new(Vec::new()),
            max_log_entries,
        }
    }

    /// A registry pre-seeded with the demo fixture nodes, including the
    /// deterministic offline sentinel.
    pub fn with_demo_nodes(now: UnixMillis) -> Self {
        let registry = Self::default();
        registry.seed_demo_nodes(now);
        registry
    }

    /// Append the demo fixture nodes to this registry.
    pub fn seed_demo_nodes(&self, now: UnixMillis) {
        let demo = [
            ("Google", "google.com"),
            ("GitHub API", "api.github.com"),
            ("Cloudflare DNS", "1.1.1.1"),
            ("Offline Test", crate::probe::DOWN_SENTINEL_ADDRESS),
        ];
        let mut nodes = self.nodes.write();
        for (display_name, address) in demo {
            nodes.push(Node::new(
                Uuid::new_v4().to_string(),
                display_name,
                address,
                now,
            ));
        }
    }

    /// Number of tracked nodes.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Snapshot of the tracked nodes, in display order.
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.read().clone()
    }

    /// Snapshot of the activity log, most-recent-first.
    pub fn activity_log(&self) -> Vec<ActivityLogEntry> {
        self.log.read().clone()
    }

    /// Both collections in serializable session-handoff form.
    pub fn session_snapshot(&self, now: UnixMillis) -> SessionSnapshot {
        let nodes = self.nodes.read();
        let log = self.log.read();
        SessionSnapshot::builder()
            .timestamp(now)
            .nodes(nodes.clone())
            .activity(log.clone())
            .build()
    }

    /// Start tracking a new node in `Pending` state.
    ///
    /// Rejects empty fields and duplicate addresses without mutating
    /// anything. Returns the newly created node.
    pub fn add_node_at(
        &self,
        display_name: &str,
        address: &str,
        now: UnixMillis,
    ) -> Result<Node> {
        let display_name = non_empty(display_name, "display name")?;
        let address = non_empty(address, "address")?;

        let mut nodes = self.nodes.write();
        if nodes.iter().any(|n| n.address == address) {
            return Err(Error::DuplicateAddress {
                address: address.to_string(),
            });
        }

        let node = Node::new(Uuid::new_v4().to_string(), display_name, address, now);
        nodes.push(node.clone());
        tracing::debug!(id = %node.id, address = %node.address, "node added");
        Ok(node)
    }

    /// [`Registry::add_node_at`] with the current wall-clock instant.
    pub fn add_node(&self, display_name: &str, address: &str) -> Result<Node> {
        self.add_node_at(display_name, address, UnixMillis::now())
    }

    /// Stop tracking a node. Activity entries referencing it persist.
    pub fn remove_node(&self, id: &str) -> Result<()> {
        let mut nodes = self.nodes.write();
        let before = nodes.len();
        nodes.retain(|n| n.id != id);
        if nodes.len() == before {
            return Err(Error::NodeNotFound { id: id.to_string() });
        }
        tracing::debug!(%id, "node removed");
        Ok(())
    }

    /// Rename a node in place. Monitoring state is untouched.
    pub fn update_node(&self, id: &str, display_name: &str, address: &str) -> Result<()> {
        let display_name = non_empty(display_name, "display name")?;
        let address = non_empty(address, "address")?;

        let mut nodes = self.nodes.write();
        let node = nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::NodeNotFound { id: id.to_string() })?;
        node.display_name = display_name.to_string();
        node.address = address.to_string();
        Ok(())
    }

    /// Move the node at `from` to position `to`. Pure list splice; no
    /// status implications.
    pub fn reorder_nodes(&self, from: usize, to: usize) -> Result<()> {
        let mut nodes = self.nodes.write();
        let len = nodes.len();
        if from >= len {
            return Err(Error::InvalidIndex { index: from, len });
        }
        if to >= len {
            return Err(Error::InvalidIndex { index: to, len });
        }
        let node = nodes.remove(from);
        nodes.insert(to, node);
        Ok(())
    }

    /// Run one monitoring tick across all nodes at `now`.
    ///
    /// Probes every node, advances its uptime accounting, records any
    /// transitions in the activity log, and publishes the new collection
    /// atomically. Returns the notifications produced, for the caller to
    /// dispatch.
    pub fn tick_at(&self, prober: &mut dyn Prober, now: UnixMillis) -> Vec<Notification> {
        // One label for the whole tick: history entries across nodes in
        // the same tick carry identical time labels.
        let label = time_label(now);

        let mut nodes = self.nodes.write();
        let mut entries = Vec::new();
        let mut notifications = Vec::new();

        let next: Vec<Node> = nodes
            .iter()
            .map(|node| {
                let outcome = prober.probe(node);
                let adv = uptime::advance(node, outcome.status, now);

                if let Some(elapsed) = adv.closed_interval {
                    entries.push(activity::record_transition(
                        node,
                        outcome.status,
                        elapsed,
                        now,
                    ));
                    notifications.push(Notification::for_transition(node, outcome.status));
                    tracing::debug!(
                        id = %node.id,
                        from = %node.status,
                        to = %outcome.status,
                        elapsed_secs = elapsed,
                        "status transition"
                    );
                }

                let mut updated = node.clone();
                updated.status = outcome.status;
                updated.latency = outcome.latency;
                updated.push_sample(PingSample {
                    time: label.clone(),
                    latency: outcome.latency,
                });
                updated.uptime = adv.uptime_percent;
                updated.total_uptime_seconds = adv.total_uptime_seconds;
                updated.last_status_change = adv.last_status_change;
                updated
            })
            .collect();

        *nodes = next;

        if !entries.is_empty() {
            // Still under the nodes write lock: log and collection publish
            // as a single consistent snapshot.
            let mut log = self.log.write();
            for entry in entries.into_iter().rev() {
                log.insert(0, entry);
            }
            if let Some(cap) = self.max_log_entries {
                log.truncate(cap);
            }
        }

        notifications
    }

    /// [`Registry::tick_at`] with the current wall-clock instant.
    pub fn tick(&self, prober: &mut dyn Prober) -> Vec<Notification> {
        self.tick_at(prober, UnixMillis::now())
    }
}

fn non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidField { field });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{PingOutcome, ScriptedProber, SimulatedProber};
    use nodewatch_types::MAX_HISTORY;

    const TOLERANCE: f64 = 1e-9;

    fn t(secs: u64) -> UnixMillis {
        UnixMillis::from_secs(1_700_000_000 + secs)
    }

    #[test]
    fn add_node_starts_pending() {
        let registry = Registry::default();
        let node = registry.add_node_at("Google", "google.com", t(0)).unwrap();

        assert_eq!(node.status, NodeStatus::Pending);
        assert_eq!(node.created_at, t(0));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.nodes()[0].id, node.id);
    }

    #[test]
    fn add_node_trims_fields() {
        let registry = Registry::default();
        let node = registry.add_node_at("  Google  ", " google.com ", t(0)).unwrap();
        assert_eq!(node.display_name, "Google");
        assert_eq!(node.address, "google.com");
    }

    #[test]
    fn add_node_rejects_empty_fields() {
        let registry = Registry::default();
        assert!(matches!(
            registry.add_node_at("  ", "google.com", t(0)),
            Err(Error::InvalidField { field: "display name" })
        ));
        assert!(matches!(
            registry.add_node_at("Google", "", t(0)),
            Err(Error::InvalidField { field: "address" })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_address_rejected_without_mutation() {
        let registry = Registry::default();
        registry.add_node_at("Google", "google.com", t(0)).unwrap();

        let err = registry.add_node_at("Also Google", "google.com", t(1));
        assert!(matches!(err, Err(Error::DuplicateAddress { .. })));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.nodes()[0].display_name, "Google");
    }

    #[test]
    fn remove_node_keeps_activity_entries() {
        let registry = Registry::default();
        let node = registry.add_node_at("A", "a.test", t(0)).unwrap();

        // Drive a transition so the log has an entry for this node
        let mut prober = ScriptedProber::new(vec![
            PingOutcome::online(50),
            PingOutcome::offline(),
        ]);
        registry.tick_at(&mut prober, t(3));
        registry.tick_at(&mut prober, t(6));
        assert_eq!(registry.activity_log().len(), 1);

        registry.remove_node(&node.id).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.activity_log().len(), 1);
        assert_eq!(registry.activity_log()[0].node_id, node.id);
    }

    #[test]
    fn remove_unknown_node_errors() {
        let registry = Registry::default();
        assert!(matches!(
            registry.remove_node("nope"),
            Err(Error::NodeNotFound { .. })
        ));
    }

    #[test]
    fn update_node_preserves_monitoring_state() {
        let registry = Registry::default();
        let node = registry.add_node_at("A", "a.test", t(0)).unwrap();

        let mut prober = ScriptedProber::new(vec![PingOutcome::online(42)]);
        registry.tick_at(&mut prober, t(3));

        registry.update_node(&node.id, "Renamed", "b.test").unwrap();
        let updated = &registry.nodes()[0];
        assert_eq!(updated.display_name, "Renamed");
        assert_eq!(updated.address, "b.test");
        assert_eq!(updated.status, NodeStatus::Online);
        assert_eq!(updated.ping_history.len(), 1);
        assert_eq!(updated.last_status_change, t(3));
    }

    #[test]
    fn reorder_moves_a_single_element() {
        let registry = Registry::default();
        registry.add_node_at("A", "a.test", t(0)).unwrap();
        registry.add_node_at("B", "b.test", t(0)).unwrap();
        registry.add_node_at("C", "c.test", t(0)).unwrap();

        registry.reorder_nodes(0, 2).unwrap();
        let order: Vec<String> =
            registry.nodes().iter().map(|n| n.display_name.clone()).collect();
        assert_eq!(order, ["B", "C", "A"]);
    }

    #[test]
    fn reorder_out_of_range_is_an_error() {
        let registry = Registry::default();
        registry.add_node_at("A", "a.test", t(0)).unwrap();

        assert!(matches!(
            registry.reorder_nodes(0, 1),
            Err(Error::InvalidIndex { index: 1, len: 1 })
        ));
        assert!(matches!(
            registry.reorder_nodes(3, 0),
            Err(Error::InvalidIndex { index: 3, len: 1 })
        ));
        assert_eq!(registry.nodes()[0].display_name, "A");
    }

    #[test]
    fn first_tick_never_logs_or_notifies() {
        let registry = Registry::default();
        registry.add_node_at("A", "a.test", t(0)).unwrap();

        let mut prober = ScriptedProber::new(vec![PingOutcome::offline()]);
        let notifications = registry.tick_at(&mut prober, t(3));

        assert!(notifications.is_empty());
        assert!(registry.activity_log().is_empty());
        assert_eq!(registry.nodes()[0].status, NodeStatus::Offline);
        assert_eq!(registry.nodes()[0].last_status_change, t(3));
    }

    #[test]
    fn same_status_tick_refreshes_history_only() {
        let registry = Registry::default();
        registry.add_node_at("A", "a.test", t(0)).unwrap();

        let mut prober = ScriptedProber::new(vec![
            PingOutcome::online(50),
            PingOutcome::online(80),
        ]);
        registry.tick_at(&mut prober, t(3));
        let notifications = registry.tick_at(&mut prober, t(6));

        assert!(notifications.is_empty());
        assert!(registry.activity_log().is_empty());

        let node = &registry.nodes()[0];
        assert_eq!(node.latency, Some(80));
        assert_eq!(node.ping_history.len(), 2);
        // No transition: the original change instant is preserved
        assert_eq!(node.last_status_change, t(3));
    }

    #[test]
    fn transition_scenario_produces_two_entries_newest_first() {
        let registry = Registry::default();
        registry.add_node_at("X", "x.test", t(0)).unwrap();

        let mut prober = ScriptedProber::new(vec![
            PingOutcome::online(40),  // tick 1: pending -> online, no entry
            PingOutcome::offline(),   // tick 2: online -> offline
            PingOutcome::online(60),  // tick 3: offline -> online
        ]);

        let n1 = registry.tick_at(&mut prober, t(3));
        let n2 = registry.tick_at(&mut prober, t(8));
        let n3 = registry.tick_at(&mut prober, t(15));

        assert!(n1.is_empty());
        assert_eq!(n2.len(), 1);
        assert_eq!(n3.len(), 1);

        let log = registry.activity_log();
        assert_eq!(log.len(), 2);

        // Most-recent-first: the offline->online transition leads
        assert_eq!(log[0].status, NodeStatus::Online);
        assert!((log[0].duration_seconds - 7.0).abs() < TOLERANCE); // t15 - t8
        assert_eq!(log[0].timestamp, t(15));

        assert_eq!(log[1].status, NodeStatus::Offline);
        assert!((log[1].duration_seconds - 5.0).abs() < TOLERANCE); // t8 - t3
        assert_eq!(log[1].timestamp, t(8));
    }

    #[test]
    fn offline_transition_notifies_destructively() {
        use crate::notify::Severity;

        let registry = Registry::default();
        registry.add_node_at("X", "x.test", t(0)).unwrap();

        let mut prober = ScriptedProber::new(vec![
            PingOutcome::online(40),
            PingOutcome::offline(),
        ]);
        registry.tick_at(&mut prober, t(3));
        let notifications = registry.tick_at(&mut prober, t(6));

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Node Unreachable");
        assert_eq!(notifications[0].severity, Severity::Destructive);
        assert_eq!(notifications[0].description, "X (x.test) is now offline.");
    }

    #[test]
    fn history_is_bounded_and_labels_match_within_a_tick() {
        let registry = Registry::default();
        registry.add_node_at("A", "a.test", t(0)).unwrap();
        registry.add_node_at("B", "b.test", t(0)).unwrap();

        let mut prober = SimulatedProber::always_online();
        for i in 0..MAX_HISTORY as u64 + 5 {
            registry.tick_at(&mut prober, t(3 * (i + 1)));
        }

        let nodes = registry.nodes();
        for node in &nodes {
            assert!(node.ping_history.len() <= MAX_HISTORY);
        }
        // Same tick, same label, across nodes
        assert_eq!(nodes[0].ping_history[0].time, nodes[1].ping_history[0].time);
    }

    #[test]
    fn uptime_stays_in_bounds_after_every_tick() {
        let registry = Registry::default();
        registry.add_node_at("A", "a.test", t(0)).unwrap();
        registry
            .add_node_at("Down", crate::probe::DOWN_SENTINEL_ADDRESS, t(0))
            .unwrap();

        let mut prober = SimulatedProber::default();
        for i in 0..50 {
            registry.tick_at(&mut prober, t(3 * (i + 1)));
            for node in registry.nodes() {
                assert!(
                    (0.0..=100.0).contains(&node.uptime),
                    "uptime {} out of bounds",
                    node.uptime
                );
                assert!(node.total_uptime_seconds >= 0.0);
            }
        }
    }

    #[test]
    fn sentinel_node_never_accrues_uptime() {
        let registry = Registry::default();
        registry
            .add_node_at("Offline Test", crate::probe::DOWN_SENTINEL_ADDRESS, t(0))
            .unwrap();

        let mut prober = SimulatedProber::default();
        for i in 0..10 {
            registry.tick_at(&mut prober, t(3 * (i + 1)));
        }

        let node = &registry.nodes()[0];
        assert_eq!(node.status, NodeStatus::Offline);
        assert_eq!(node.total_uptime_seconds, 0.0);
        assert_eq!(node.uptime, 0.0);
        // Pending -> offline plus same-status ticks: nothing to log
        assert!(registry.activity_log().is_empty());
    }

    #[test]
    fn log_cap_evicts_oldest_entries() {
        let registry = Registry::new(Some(3));
        registry.add_node_at("A", "a.test", t(0)).unwrap();

        // Strict alternation after the first observation: every tick
        // from the second onward closes an interval
        let mut prober = ScriptedProber::new(vec![
            PingOutcome::online(40),
            PingOutcome::offline(),
        ]);
        for i in 0..8 {
            registry.tick_at(&mut prober, t(3 * (i + 1)));
        }

        let log = registry.activity_log();
        assert_eq!(log.len(), 3);
        // Newest entry first; the earliest transitions were evicted
        assert_eq!(log[0].timestamp, t(24));
        assert_eq!(log[1].timestamp, t(21));
        assert_eq!(log[2].timestamp, t(18));
    }

    #[test]
    fn uncapped_log_grows_freely() {
        let registry = Registry::new(None);
        registry.add_node_at("A", "a.test", t(0)).unwrap();

        let mut prober = ScriptedProber::new(vec![
            PingOutcome::online(40),
            PingOutcome::offline(),
        ]);
        for i in 0..9 {
            registry.tick_at(&mut prober, t(3 * (i + 1)));
        }
        assert_eq!(registry.activity_log().len(), 8);
    }

    #[test]
    fn demo_registry_contains_the_fixture_set() {
        let registry = Registry::with_demo_nodes(t(0));
        let addresses: Vec<String> =
            registry.nodes().iter().map(|n| n.address.clone()).collect();

        assert_eq!(
            addresses,
            ["google.com", "api.github.com", "1.1.1.1", "down-node.test"]
        );
        assert!(registry.nodes().iter().all(|n| n.status == NodeStatus::Pending));
    }

    #[test]
    fn session_snapshot_carries_both_collections() {
        let registry = Registry::default();
        registry.add_node_at("A", "a.test", t(0)).unwrap();

        let mut prober = ScriptedProber::new(vec![
            PingOutcome::online(40),
            PingOutcome::offline(),
        ]);
        registry.tick_at(&mut prober, t(3));
        registry.tick_at(&mut prober, t(6));

        let snapshot = registry.session_snapshot(t(7));
        assert!(snapshot.is_compatible());
        assert_eq!(snapshot.timestamp_ms, t(7));
        assert_eq!(snapshot.nodes.len(), 1);
        assert_eq!(snapshot.activity.len(), 1);
        assert_eq!(snapshot.activity[0].node_id, snapshot.nodes[0].id);
    }

    #[test]
    fn tick_with_no_nodes_is_a_no_op() {
        let registry = Registry::default();
        let mut prober = SimulatedProber::default();
        let notifications = registry.tick_at(&mut prober, t(3));
        assert!(notifications.is_empty());
        assert!(registry.activity_log().is_empty());
    }
}
