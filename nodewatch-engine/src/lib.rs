//! # nodewatch-engine
//!
//! Simulated node monitoring engine. A recurring tick probes every tracked
//! node with a pseudo-random prober, advances its uptime accounting,
//! records status transitions in an activity log and emits notifications -
//! all without any real network I/O.
//!
//! Rendering is out of scope: dashboards, toast frontends and exporters
//! consume the engine's output (`nodes()`, `activity_log()`, notification
//! sinks, CSV export, session snapshots).
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                         Monitor                            │
//! │  ┌────────┐   ┌─────────┐   ┌──────────┐   ┌────────────┐ │
//! │  │ probe  │──▶│ uptime  │──▶│ activity │──▶│  Registry  │ │
//! │  │(sample)│   │(account)│   │ (record) │   │ (publish)  │ │
//! │  └────────┘   └─────────┘   └──────────┘   └─────┬──────┘ │
//! │       ▲                                          │        │
//! │       │ tick (scheduler or manual)               ▼        │
//! │  ┌────┴────┐                            ┌──────────────┐  │
//! │  │ engine  │───────notifications───────▶│    sinks     │  │
//! │  └─────────┘                            └──────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`probe`]**: the [`Prober`] trait and the random/scripted implementations
//! - **[`uptime`]**: pure uptime accounting across one observed sample
//! - **[`activity`]**: activity-log entry construction for closed intervals
//! - **[`state`]**: the [`Registry`] - shared collections and the single-writer tick
//! - **[`engine`]**: the [`Monitor`] - configuration, manual ticks and the
//!   background scheduler (requires the default `tokio` feature)
//! - **[`notify`]**: [`Notification`] values and delivery sinks
//! - **[`export`]**: CSV export/re-import of the activity log
//! - **[`session`]**: JSON session handoff with degrade-to-empty parsing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nodewatch_engine::{EngineConfig, Monitor, NotificationSink};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (sink, mut notifications) = NotificationSink::channel(16);
//!
//!     let monitor = Monitor::builder()
//!         .config(EngineConfig::default())
//!         .demo_nodes()
//!         .sink(sink)
//!         .build();
//!
//!     monitor.registry().add_node("Internal API", "api.internal.test").unwrap();
//!
//!     // Start background ticking (non-blocking)
//!     let handle = monitor.start();
//!
//!     // A toast frontend would drain the channel:
//!     // while let Some(n) = notifications.recv().await { render(n); }
//!
//!     handle.stop();
//! }
//! ```

pub mod activity;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod notify;
pub mod probe;
pub mod session;
pub mod state;
pub mod uptime;

pub use config::{
    EngineConfig, DEFAULT_MAX_LOG_ENTRIES, DEFAULT_PING_INTERVAL_SECS, MAX_PING_INTERVAL_SECS,
    MIN_PING_INTERVAL_SECS,
};
pub use engine::{Monitor, MonitorBuilder};
pub use error::{Error, Result};
pub use export::{ExportedEntry, CSV_HEADERS};
pub use notify::{Notification, NotificationSink, Severity};
pub use probe::{PingOutcome, Prober, ScriptedProber, SimulatedProber, DOWN_SENTINEL_ADDRESS};
pub use state::Registry;
pub use uptime::UptimeAdvance;

#[cfg(feature = "tokio")]
pub use engine::MonitorHandle;

// Re-export types for convenience
pub use nodewatch_types::{
    ActivityLogEntry, Node, NodeStatus, PingSample, SessionSnapshot, UnixMillis, MAX_HISTORY,
    SNAPSHOT_VERSION,
};
