//! Built-in refresh-time policies.
//!
//! - [`AutoRefreshCalculator`] - Trust self-describing values, otherwise never (default)
//! - [`LingerRefreshCalculator`] - Refresh a fixed duration after every transition
//! - [`NeverRefreshCalculator`] - Never schedule an automatic refresh
//!
//! All three are stateless and cheap to copy. Build one at configuration
//! time and share it with every entry.

use std::time::Duration;

use crate::calculator::RefreshTimeCalculator;
use crate::capability::RefreshCapability;
use crate::error::RefreshError;
use crate::time::Timestamp;

/// Automatic policy: the value decides.
///
/// If the new value exposes [`NextRefreshTime`](crate::NextRefreshTime),
/// its answer is returned unmodified; the old value and both timestamps are
/// ignored. Otherwise the result is [`Timestamp::NEVER`], leaving the entry
/// to the cache's own default linger or expiry.
///
/// Accessor errors propagate. Past or negative times pass through as-is.
///
/// # Example
///
/// ```
/// use refreshbox_core::{AutoRefreshCalculator, RefreshTimeCalculator, Timestamp, WithNextRefreshTime};
///
/// let auto = AutoRefreshCalculator::new();
/// let now = Timestamp::from_millis(9_999_999);
///
/// let plain = String::from("no metadata");
/// assert_eq!(
///     auto.calculate_next_refresh_time(None, &plain, now, now)?,
///     Timestamp::NEVER,
/// );
///
/// let described = WithNextRefreshTime::new("ttl from upstream", Timestamp::from_millis(5_000));
/// assert_eq!(
///     auto.calculate_next_refresh_time(None, &described, now, now)?,
///     Timestamp::from_millis(5_000),
/// );
/// # Ok::<(), refreshbox_core::RefreshError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoRefreshCalculator;

impl AutoRefreshCalculator {
    /// Create the automatic policy.
    pub const fn new() -> Self {
        Self
    }
}

impl<T> RefreshTimeCalculator<T> for AutoRefreshCalculator
where
    T: RefreshCapability + ?Sized,
{
    fn calculate_next_refresh_time(
        &self,
        _old_value: Option<&T>,
        new_value: &T,
        _last_refresh_time: Timestamp,
        _now: Timestamp,
    ) -> Result<Timestamp, RefreshError> {
        match new_value.as_next_refresh_time() {
            Some(capability) => {
                let next = capability.next_refresh_time()?;
                tracing::trace!(%next, "AutoRefresh policy: value reports its refresh time");
                Ok(next)
            }
            None => {
                tracing::trace!("AutoRefresh policy: no refresh time capability");
                Ok(Timestamp::NEVER)
            }
        }
    }
}

const LATEST: Timestamp = Timestamp::from_millis(i64::MAX - 1);

/// Linger policy: every value is due a fixed duration after it was stored.
///
/// The result is `now + linger`, saturating one millisecond before
/// [`Timestamp::NEVER`], so a huge linger is never mistaken for the "never"
/// sentinel. A zero linger makes every value due immediately.
///
/// # Example
///
/// ```
/// use refreshbox_core::{LingerRefreshCalculator, RefreshTimeCalculator, Timestamp};
/// use std::time::Duration;
///
/// let linger = LingerRefreshCalculator::new(Duration::from_secs(30));
/// let next = linger
///     .calculate_next_refresh_time(None, &1u32, Timestamp::from_millis(0), Timestamp::from_millis(1_000))?;
/// assert_eq!(next, Timestamp::from_millis(31_000));
/// # Ok::<(), refreshbox_core::RefreshError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LingerRefreshCalculator {
    linger: Duration,
}

impl LingerRefreshCalculator {
    /// Create a linger policy.
    pub const fn new(linger: Duration) -> Self {
        Self { linger }
    }

    /// The configured linger duration.
    #[inline]
    pub fn linger(&self) -> Duration {
        self.linger
    }
}

impl<T> RefreshTimeCalculator<T> for LingerRefreshCalculator
where
    T: ?Sized,
{
    fn calculate_next_refresh_time(
        &self,
        _old_value: Option<&T>,
        _new_value: &T,
        _last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> Result<Timestamp, RefreshError> {
        Ok((now + self.linger).min(LATEST))
    }
}

/// Never policy: always answers [`Timestamp::NEVER`], even for
/// self-describing values.
///
/// The engine treats the answer like any other "never": the cache's default
/// linger applies when one is configured, otherwise entries stay until
/// invalidated externally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverRefreshCalculator;

impl NeverRefreshCalculator {
    /// Create the never policy.
    pub const fn new() -> Self {
        Self
    }
}

impl<T> RefreshTimeCalculator<T> for NeverRefreshCalculator
where
    T: ?Sized,
{
    fn calculate_next_refresh_time(
        &self,
        _old_value: Option<&T>,
        _new_value: &T,
        _last_refresh_time: Timestamp,
        _now: Timestamp,
    ) -> Result<Timestamp, RefreshError> {
        Ok(Timestamp::NEVER)
    }
}
