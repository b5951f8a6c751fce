//! Engine configuration and validation.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum supported ping interval in seconds.
pub const MIN_PING_INTERVAL_SECS: u64 = 1;
/// Maximum supported ping interval in seconds.
pub const MAX_PING_INTERVAL_SECS: u64 = 10;
/// Default ping interval in seconds.
pub const DEFAULT_PING_INTERVAL_SECS: u64 = 3;
/// Default activity log cap; oldest entries are evicted past this.
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 1000;

/// Tunable settings for the monitoring engine.
///
/// The ping interval is an integer number of seconds in `[1, 10]`.
/// Construction and deserialization both validate the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds between monitoring ticks.
    pub ping_interval_secs: u64,
    /// Activity log cap; `None` disables eviction.
    pub max_log_entries: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ping_interval_secs: DEFAULT_PING_INTERVAL_SECS,
            max_log_entries: Some(DEFAULT_MAX_LOG_ENTRIES),
        }
    }
}

impl EngineConfig {
    /// Create a config with a validated ping interval and default log cap.
    pub fn new(ping_interval_secs: u64) -> Result<Self> {
        validate_interval(ping_interval_secs)?;
        Ok(Self {
            ping_interval_secs,
            ..Self::default()
        })
    }

    /// Load configuration from an optional file plus `NODEWATCH_`-prefixed
    /// environment variables (e.g. `NODEWATCH_PING_INTERVAL_SECS=5`).
    ///
    /// A missing file is not an error; defaults fill any unset key.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("ping_interval_secs", DEFAULT_PING_INTERVAL_SECS as i64)?
            .set_default("max_log_entries", DEFAULT_MAX_LOG_ENTRIES as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("NODEWATCH"))
            .build()?;

        let cfg: EngineConfig = settings.try_deserialize()?;
        cfg.validated()
    }

    /// Validate this config, returning it on success.
    pub fn validated(self) -> Result<Self> {
        validate_interval(self.ping_interval_secs)?;
        Ok(self)
    }

    /// The tick period as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }
}

/// Check a ping interval against the supported range.
pub fn validate_interval(seconds: u64) -> Result<()> {
    if !(MIN_PING_INTERVAL_SECS..=MAX_PING_INTERVAL_SECS).contains(&seconds) {
        return Err(Error::InvalidInterval {
            seconds,
            min: MIN_PING_INTERVAL_SECS,
            max: MAX_PING_INTERVAL_SECS,
        });
    }
    Ok(())
}
