//! Millisecond timestamps used by refresh policies.
//!
//! Every time a policy sees or produces is a [`Timestamp`]: signed
//! milliseconds since the Unix epoch. One unit is shared across a whole
//! cache instance, so policies never convert between clocks.
//!
//! [`Timestamp::NEVER`] is the maximum representable value and means
//! "never refresh automatically".

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

/// Milliseconds since the Unix epoch.
///
/// Arithmetic saturates instead of overflowing, so adding a linger to
/// [`Timestamp::NEVER`] stays `NEVER`. Negative values are representable;
/// policies pass them through without sanitizing.
///
/// # Example
///
/// ```
/// use refreshbox_core::Timestamp;
/// use std::time::Duration;
///
/// let now = Timestamp::from_millis(1_000);
/// assert_eq!(now + Duration::from_secs(2), Timestamp::from_millis(3_000));
/// assert_eq!(Timestamp::NEVER + Duration::from_secs(1), Timestamp::NEVER);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The "never due" sentinel.
    pub const NEVER: Timestamp = Timestamp(i64::MAX);

    /// The Unix epoch.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Creates a timestamp from milliseconds since the epoch.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Milliseconds since the epoch.
    #[inline]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Reads the wall clock.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Returns `true` for the [`Timestamp::NEVER`] sentinel.
    #[inline]
    pub const fn is_never(self) -> bool {
        self.0 == i64::MAX
    }

    /// Time elapsed since `earlier`, clamped at zero.
    ///
    /// A clock that went backwards yields [`Duration::ZERO`] instead of
    /// panicking.
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        let millis = self.0.saturating_sub(earlier.0);
        if millis <= 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(millis as u64)
        }
    }

    /// Adds a duration, saturating at [`Timestamp::NEVER`].
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        Timestamp(self.0.saturating_add(millis))
    }

    /// Converts to a chrono date time.
    ///
    /// Returns `None` for values outside chrono's range, which includes
    /// [`Timestamp::NEVER`].
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp(value.timestamp_millis())
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_never() {
            f.write_str("never")
        } else {
            write!(f, "{}ms", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_is_max() {
        assert_eq!(Timestamp::NEVER.as_millis(), i64::MAX);
        assert!(Timestamp::NEVER.is_never());
        assert!(Timestamp::from_millis(0) < Timestamp::NEVER);
    }

    #[test]
    fn test_saturating_add() {
        let ts = Timestamp::from_millis(i64::MAX - 10);
        assert_eq!(ts + Duration::from_millis(100), Timestamp::NEVER);
        assert_eq!(
            Timestamp::EPOCH + Duration::from_secs(u64::MAX),
            Timestamp::NEVER
        );
    }

    #[test]
    fn test_duration_since_clamps_backwards_clock() {
        let earlier = Timestamp::from_millis(2_000);
        let later = Timestamp::from_millis(1_000);
        assert_eq!(later.saturating_duration_since(earlier), Duration::ZERO);
        assert_eq!(
            earlier.saturating_duration_since(later),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_datetime_conversion() {
        let dt = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let ts = Timestamp::from(dt);
        assert_eq!(ts.as_millis(), 1_700_000_000_123);
        assert_eq!(ts.to_datetime(), Some(dt));
        assert_eq!(Timestamp::NEVER.to_datetime(), None);
    }

    #[test]
    fn test_now_reads_wall_clock() {
        let before = Timestamp::from(Utc::now());
        let now = Timestamp::now();
        assert!(now >= before);
        assert!(!now.is_never());
        assert!(now.to_datetime().is_some());
    }

    #[test]
    fn test_display() {
        assert_eq!(Timestamp::from_millis(42).to_string(), "42ms");
        assert_eq!(Timestamp::NEVER.to_string(), "never");
    }
}
