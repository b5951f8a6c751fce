//! Session snapshot - a point-in-time view of the monitored state.

use alloc::vec::Vec;

use crate::{ActivityLogEntry, Node, UnixMillis, SNAPSHOT_VERSION};

/// A point-in-time snapshot of the node collection and activity log.
///
/// This is the session-handoff form: the engine exposes both collections
/// through it so a secondary view (an activity/history page, an exporter)
/// can be handed the full state in serializable form.
///
/// # Example
///
/// ```rust
/// use nodewatch_types::{Node, SessionSnapshot, UnixMillis};
///
/// let now = UnixMillis::from_secs(1_700_000_000);
/// let snapshot = SessionSnapshot::builder()
///     .timestamp(now)
///     .node(Node::new("id-1", "Google", "google.com", now))
///     .build();
///
/// assert!(snapshot.is_compatible());
/// assert_eq!(snapshot.nodes.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSnapshot {
    /// Schema version for forward compatibility.
    pub version: u32,

    /// Instant this snapshot was taken.
    pub timestamp_ms: UnixMillis,

    /// All tracked nodes, in display order.
    pub nodes: Vec<Node>,

    /// Activity log, most-recent-first.
    pub activity: Vec<ActivityLogEntry>,
}

impl SessionSnapshot {
    /// Create an empty snapshot taken at the current wall-clock instant.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_timestamp(UnixMillis::now())
    }

    /// Create an empty snapshot taken at a specific instant.
    pub fn with_timestamp(timestamp_ms: UnixMillis) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            timestamp_ms,
            nodes: Vec::new(),
            activity: Vec::new(),
        }
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> SessionSnapshotBuilder {
        SessionSnapshotBuilder::new()
    }

    /// Check if the snapshot carries no data at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.activity.is_empty()
    }

    /// Check if this snapshot's schema version can be read by this library.
    pub fn is_compatible(&self) -> bool {
        self.version == SNAPSHOT_VERSION
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Activity entries referring to a specific node.
    pub fn activity_for<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a ActivityLogEntry> + 'a {
        self.activity.iter().filter(move |e| e.node_id == node_id)
    }
}

#[cfg(feature = "std")]
impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing `SessionSnapshot` instances.
#[derive(Debug, Default)]
pub struct SessionSnapshotBuilder {
    timestamp_ms: Option<UnixMillis>,
    nodes: Vec<Node>,
    activity: Vec<ActivityLogEntry>,
}

impl SessionSnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snapshot instant.
    pub fn timestamp(mut self, ts: UnixMillis) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    /// Add a single node.
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Replace the full node collection.
    pub fn nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Add a single activity entry.
    pub fn entry(mut self, entry: ActivityLogEntry) -> Self {
        self.activity.push(entry);
        self
    }

    /// Replace the full activity log.
    pub fn activity(mut self, activity: Vec<ActivityLogEntry>) -> Self {
        self.activity = activity;
        self
    }

    /// Build the snapshot.
    #[cfg(feature = "std")]
    pub fn build(self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            timestamp_ms: self.timestamp_ms.unwrap_or_else(UnixMillis::now),
            nodes: self.nodes,
            activity: self.activity,
        }
    }

    /// Build the snapshot with an explicit fallback timestamp (for no_std).
    #[cfg(not(feature = "std"))]
    pub fn build(self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            timestamp_ms: self.timestamp_ms.unwrap_or_default(),
            nodes: self.nodes,
            activity: self.activity,
        }
    }
}
