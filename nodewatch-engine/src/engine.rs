//! The monitoring engine: configuration, ticking and scheduling.
//!
//! A [`Monitor`] owns the registry, the prober and the notification
//! sinks. Ticks can be driven manually (`tick` / `tick_at`) or by the
//! background scheduler (`start`), which is the normal mode.

use std::sync::Arc;
#[cfg(feature = "tokio")]
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use nodewatch_types::{ActivityLogEntry, Node, SessionSnapshot, UnixMillis};

use crate::config::{validate_interval, EngineConfig};
use crate::error::Result;
use crate::notify::{Notification, NotificationSink};
use crate::probe::{Prober, SimulatedProber};
use crate::state::Registry;

/// The monitoring engine.
///
/// # Example
///
/// ```rust,no_run
/// use nodewatch_engine::{EngineConfig, Monitor};
///
/// #[tokio::main]
/// async fn main() {
///     let monitor = Monitor::builder()
///         .config(EngineConfig::default())
///         .demo_nodes()
///         .build();
///
///     // Start background ticking (non-blocking)
///     let handle = monitor.start();
///
///     // ... the dashboard reads monitor.nodes() / monitor.activity_log() ...
///
///     handle.stop();
/// }
/// ```
pub struct Monitor {
    registry: Arc<Registry>,
    prober: Arc<Mutex<Box<dyn Prober + Send>>>,
    sinks: Arc<Vec<NotificationSink>>,
    config: RwLock<EngineConfig>,
    #[cfg(feature = "tokio")]
    interval_tx: tokio::sync::watch::Sender<Duration>,
}

impl Monitor {
    /// Create a monitor with default settings: default config, the
    /// random prober, no sinks, an empty registry.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for configuring the monitor.
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// The shared registry. CRUD operations go through this.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Snapshot of the tracked nodes.
    pub fn nodes(&self) -> Vec<Node> {
        self.registry.nodes()
    }

    /// Snapshot of the activity log, most-recent-first.
    pub fn activity_log(&self) -> Vec<ActivityLogEntry> {
        self.registry.activity_log()
    }

    /// Both collections in serializable session-handoff form.
    pub fn session_snapshot(&self) -> SessionSnapshot {
        self.registry.session_snapshot(UnixMillis::now())
    }

    /// Current tick period in seconds.
    pub fn ping_interval_secs(&self) -> u64 {
        self.config.read().ping_interval_secs
    }

    /// Change the tick period.
    ///
    /// Validated against the supported range. Takes effect on the next
    /// scheduled tick: the running scheduler cancels its old timer and
    /// starts a new one; no in-flight tick is cancelled.
    pub fn set_ping_interval(&self, seconds: u64) -> Result<()> {
        validate_interval(seconds)?;
        self.config.write().ping_interval_secs = seconds;
        #[cfg(feature = "tokio")]
        let _ = self.interval_tx.send(Duration::from_secs(seconds));
        Ok(())
    }

    /// Run one tick at `now` and dispatch the resulting notifications.
    pub fn tick_at(&self, now: UnixMillis) -> Vec<Notification> {
        let notifications = {
            let mut prober = self.prober.lock();
            self.registry.tick_at(&mut **prober, now)
        };
        for notification in &notifications {
            for sink in self.sinks.iter() {
                sink.dispatch(notification);
            }
        }
        notifications
    }

    /// Run one tick at the current wall-clock instant.
    pub fn tick(&self) -> Vec<Notification> {
        self.tick_at(UnixMillis::now())
    }

    /// Start background ticking.
    ///
    /// Spawns a tokio task that runs one tick per configured interval.
    /// Ticks never overlap: there is a single task and a single writer.
    /// Returns a handle that stops the scheduler.
    #[cfg(feature = "tokio")]
    pub fn start(&self) -> MonitorHandle {
        use tokio::sync::watch;
        use tokio::time::{interval_at, Instant};

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let mut interval_rx = self.interval_tx.subscribe();
        let registry = self.registry.clone();
        let prober = self.prober.clone();
        let sinks = self.sinks.clone();

        tokio::spawn(async move {
            let mut period = *interval_rx.borrow();
            let mut timer = interval_at(Instant::now() + period, period);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        let notifications = {
                            let mut prober = prober.lock();
                            registry.tick_at(&mut **prober, UnixMillis::now())
                        };
                        for notification in &notifications {
                            for sink in sinks.iter() {
                                sink.dispatch(notification);
                            }
                        }
                    }
                    changed = interval_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        period = *interval_rx.borrow();
                        timer = interval_at(Instant::now() + period, period);
                    }
                    stopped = stop_rx.changed() => {
                        if stopped.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        MonitorHandle { stop_tx }
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for stopping the background scheduler.
///
/// Drop this handle to stop ticking, or call `stop()` explicitly.
#[cfg(feature = "tokio")]
pub struct MonitorHandle {
    stop_tx: tokio::sync::watch::Sender<bool>,
}

#[cfg(feature = "tokio")]
impl MonitorHandle {
    /// Stop background ticking. Already-started ticks run to completion.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}

/// Builder for configuring a [`Monitor`].
pub struct MonitorBuilder {
    config: EngineConfig,
    prober: Option<Box<dyn Prober + Send>>,
    sinks: Vec<NotificationSink>,
    registry: Option<Arc<Registry>>,
    seed_demo_nodes: bool,
}

impl MonitorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            prober: None,
            sinks: Vec::new(),
            registry: None,
            seed_demo_nodes: false,
        }
    }

    /// Use this engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom prober instead of the default [`SimulatedProber`].
    pub fn prober(mut self, prober: Box<dyn Prober + Send>) -> Self {
        self.prober = Some(prober);
        self
    }

    /// Add a notification sink. Multiple sinks can be added; every
    /// notification goes to all of them.
    pub fn sink(mut self, sink: NotificationSink) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Share an existing registry instead of creating a fresh one.
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Seed the registry with the demo fixture nodes.
    ///
    /// Ignored when an existing registry is supplied.
    pub fn demo_nodes(mut self) -> Self {
        self.seed_demo_nodes = true;
        self
    }

    /// Build the monitor.
    pub fn build(self) -> Monitor {
        let registry = self.registry.unwrap_or_else(|| {
            let registry = Registry::new(self.config.max_log_entries);
            if self.seed_demo_nodes {
                registry.seed_demo_nodes(UnixMillis::now());
            }
            Arc::new(registry)
        });
        let prober = self
            .prober
            .unwrap_or_else(|| Box::new(SimulatedProber::default()));

        #[cfg(feature = "tokio")]
        let (interval_tx, _) = tokio::sync::watch::channel(self.config.interval());

        Monitor {
            registry,
            prober: Arc::new(Mutex::new(prober)),
            sinks: Arc::new(self.sinks),
            config: RwLock::new(self.config),
            #[cfg(feature = "tokio")]
            interval_tx,
        }
    }
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
