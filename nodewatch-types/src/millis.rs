//! Timestamp representation for serialization.
//!
//! We use milliseconds since the Unix epoch as the canonical unit for
//! instants to ensure consistent serialization across formats and languages.

/// An instant in milliseconds since the Unix epoch.
///
/// This wrapper provides consistent serialization of instants and keeps the
/// arithmetic the engine cares about (elapsed seconds between two instants,
/// clamped at zero against clock skew) in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnixMillis(pub u64);

impl UnixMillis {
    /// Create from milliseconds since the epoch.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create from whole seconds since the epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1000)
    }

    /// Get the value in milliseconds.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Get the value in whole seconds (truncated).
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1000
    }

    /// The current wall-clock instant.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        Self(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
        )
    }

    /// Fractional seconds elapsed since `earlier`.
    ///
    /// Saturates at zero when `earlier` is in the future, so elapsed time
    /// never goes negative under clock skew.
    pub fn seconds_since(&self, earlier: UnixMillis) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 / 1000.0
    }

    /// This instant advanced by `secs` whole seconds. Handy in tests and
    /// for deriving deadlines from a base instant.
    pub const fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0 + secs * 1000)
    }
}

impl From<u64> for UnixMillis {
    fn from(millis: u64) -> Self {
        Self(millis)
    }
}

impl From<UnixMillis> for u64 {
    fn from(m: UnixMillis) -> Self {
        m.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let m = UnixMillis::from_secs(1500);
        assert_eq!(m.as_millis(), 1_500_000);
        assert_eq!(m.as_secs(), 1500);

        let raw: u64 = m.into();
        assert_eq!(raw, 1_500_000);
        assert_eq!(UnixMillis::from(raw), m);
    }

    #[test]
    fn seconds_since_fractional() {
        let a = UnixMillis::from_millis(10_000);
        let b = UnixMillis::from_millis(12_500);
        assert!((b.seconds_since(a) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn seconds_since_clamps_clock_skew() {
        let a = UnixMillis::from_millis(12_500);
        let b = UnixMillis::from_millis(10_000);
        // `a` is later than `b`, so elapsed time from b's perspective is zero
        assert_eq!(b.seconds_since(a), 0.0);
    }

    #[test]
    fn plus_secs_advances() {
        let base = UnixMillis::from_secs(100);
        assert_eq!(base.plus_secs(5), UnixMillis::from_secs(105));
        assert_eq!(base.plus_secs(0), base);
    }

    #[test]
    fn truncation_behavior() {
        // 1999 ms truncates to 1 second, not rounded
        let m = UnixMillis::from_millis(1999);
        assert_eq!(m.as_secs(), 1);
    }

    #[test]
    fn default_is_epoch() {
        assert_eq!(UnixMillis::default().as_millis(), 0);
    }

    #[test]
    fn ordering() {
        let a = UnixMillis::from_millis(100);
        let b = UnixMillis::from_millis(200);
        let c = UnixMillis::from_millis(100);

        assert!(a < b);
        assert!(b > a);
        assert_eq!(a, c);
    }

    #[cfg(feature = "std")]
    #[test]
    fn now_is_after_2020() {
        // Sanity guard against a broken clock conversion
        let now = UnixMillis::now();
        assert!(now > UnixMillis::from_secs(1_577_836_800)); // 2020-01-01
    }
}
