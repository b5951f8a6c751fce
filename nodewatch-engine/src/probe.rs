//! Simulated probing.
//!
//! There is no real network I/O anywhere in this crate: a [`Prober`]
//! produces synthetic status/latency samples. The default implementation
//! is random; a scripted one is provided for deterministic tests and demos.

use nodewatch_types::{Node, NodeStatus};
use rand::Rng;

/// Reserved address that always probes offline, for demoing a down node.
pub const DOWN_SENTINEL_ADDRESS: &str = "down-node.test";

/// The outcome of probing a single node once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingOutcome {
    /// `Online` or `Offline`; probing never yields `Pending`.
    pub status: NodeStatus,
    /// Latency in milliseconds, present iff online.
    pub latency: Option<u32>,
}

impl PingOutcome {
    /// An online outcome with the given latency.
    pub fn online(latency: u32) -> Self {
        Self {
            status: NodeStatus::Online,
            latency: Some(latency),
        }
    }

    /// An offline outcome.
    pub fn offline() -> Self {
        Self {
            status: NodeStatus::Offline,
            latency: None,
        }
    }
}

/// Produces one status/latency sample per node per tick.
///
/// Implementations must have no side effects beyond randomness consumption.
pub trait Prober {
    fn probe(&mut self, node: &Node) -> PingOutcome;
}

/// The default pseudo-random prober.
///
/// Nodes at [`DOWN_SENTINEL_ADDRESS`] always probe offline. Any other node
/// is offline with probability `offline_chance`, otherwise online with a
/// latency drawn uniformly from `[min_latency_ms, max_latency_ms)`.
#[derive(Debug, Clone)]
pub struct SimulatedProber {
    pub offline_chance: f64,
    pub min_latency_ms: u32,
    pub max_latency_ms: u32,
}

impl Default for SimulatedProber {
    fn default() -> Self {
        Self {
            offline_chance: 0.10,
            min_latency_ms: 20,
            max_latency_ms: 300,
        }
    }
}

impl SimulatedProber {
    /// A prober that never reports offline (except for the sentinel).
    pub fn always_online() -> Self {
        Self {
            offline_chance: 0.0,
            ..Self::default()
        }
    }
}

impl Prober for SimulatedProber {
    fn probe(&mut self, node: &Node) -> PingOutcome {
        if node.address == DOWN_SENTINEL_ADDRESS {
            return PingOutcome::offline();
        }

        let mut rng = rand::thread_rng();
        if rng.gen_bool(self.offline_chance) {
            return PingOutcome::offline();
        }
        PingOutcome::online(rng.gen_range(self.min_latency_ms..self.max_latency_ms))
    }
}

/// A prober that replays a fixed sequence of outcomes, cycling when
/// exhausted. Each `probe` call consumes one outcome regardless of node.
#[derive(Debug, Clone)]
pub struct ScriptedProber {
    outcomes: Vec<PingOutcome>,
    next: usize,
}

impl ScriptedProber {
    pub fn new(outcomes: Vec<PingOutcome>) -> Self {
        assert!(!outcomes.is_empty(), "script must contain at least one outcome");
        Self { outcomes, next: 0 }
    }
}

impl Prober for ScriptedProber {
    fn probe(&mut self, _node: &Node) -> PingOutcome {
        let outcome = self.outcomes[self.next % self.outcomes.len()];
        self.next += 1;
        outcome
    }
}
