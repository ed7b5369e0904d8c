//! The refresh-time calculator contract.
//!
//! A cache asks its [`RefreshTimeCalculator`] "when is this value's successor
//! due?" on every value transition: first load, refresh-ahead, or reload on
//! miss. The answer is an absolute [`Timestamp`]; [`Timestamp::NEVER`] means
//! the entry is left to external invalidation or the cache's own default
//! expiry.
//!
//! ## Contract
//!
//! - Pure: no side effects, no I/O, no blocking. Calculators sit on the
//!   critical path of every value write.
//! - Stateless: one instance is shared by every entry of every cache that
//!   uses it, and may be called from many threads at once.
//! - Results are not clamped. A time before `now` means "due immediately";
//!   interpreting it is the engine's job.
//!
//! Calculators are injected at configuration time by shared reference,
//! usually as a [`SharedRefreshTimeCalculator`].

use std::sync::Arc;

use crate::error::RefreshError;
use crate::time::Timestamp;
use crate::transition::Transition;

/// Policy deciding when a freshly stored value is due for refresh.
///
/// # Type Parameter
///
/// * `T` - The cached value type
///
/// # Example
///
/// ```
/// use refreshbox_core::{RefreshError, RefreshTimeCalculator, Timestamp};
///
/// /// Refreshes twice as late as the previous interval, capped at one hour.
/// struct Backoff;
///
/// impl<T: ?Sized> RefreshTimeCalculator<T> for Backoff {
///     fn calculate_next_refresh_time(
///         &self,
///         _old_value: Option<&T>,
///         _new_value: &T,
///         last_refresh_time: Timestamp,
///         now: Timestamp,
///     ) -> Result<Timestamp, RefreshError> {
///         let interval = now.saturating_duration_since(last_refresh_time) * 2;
///         Ok(now + interval.min(std::time::Duration::from_secs(3600)))
///     }
/// }
///
/// let next = Backoff
///     .calculate_next_refresh_time(None, &"v", Timestamp::from_millis(1_000), Timestamp::from_millis(2_000))
///     .unwrap();
/// assert_eq!(next, Timestamp::from_millis(4_000));
/// ```
pub trait RefreshTimeCalculator<T: ?Sized>: Send + Sync {
    /// Computes the absolute time at which `new_value` is due for refresh.
    ///
    /// # Arguments
    ///
    /// * `old_value` - The value being replaced, absent on first load
    /// * `new_value` - The value about to be stored
    /// * `last_refresh_time` - When the entry was last refreshed
    /// * `now` - Current time, in the same unit as `last_refresh_time`
    ///
    /// `now` is expected to be at or after `last_refresh_time`, but
    /// implementations must tolerate a backwards clock.
    fn calculate_next_refresh_time(
        &self,
        old_value: Option<&T>,
        new_value: &T,
        last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> Result<Timestamp, RefreshError>;
}

/// Boxed calculator for dynamic dispatch.
pub type BoxRefreshTimeCalculator<T> = Box<dyn RefreshTimeCalculator<T>>;

/// Shared calculator, the form a cache stores per instance.
pub type SharedRefreshTimeCalculator<T> = Arc<dyn RefreshTimeCalculator<T>>;

impl<T, C> RefreshTimeCalculator<T> for &C
where
    T: ?Sized,
    C: RefreshTimeCalculator<T> + ?Sized,
{
    fn calculate_next_refresh_time(
        &self,
        old_value: Option<&T>,
        new_value: &T,
        last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> Result<Timestamp, RefreshError> {
        (**self).calculate_next_refresh_time(old_value, new_value, last_refresh_time, now)
    }
}

impl<T, C> RefreshTimeCalculator<T> for Box<C>
where
    T: ?Sized,
    C: RefreshTimeCalculator<T> + ?Sized,
{
    fn calculate_next_refresh_time(
        &self,
        old_value: Option<&T>,
        new_value: &T,
        last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> Result<Timestamp, RefreshError> {
        (**self).calculate_next_refresh_time(old_value, new_value, last_refresh_time, now)
    }
}

impl<T, C> RefreshTimeCalculator<T> for Arc<C>
where
    T: ?Sized,
    C: RefreshTimeCalculator<T> + ?Sized,
{
    fn calculate_next_refresh_time(
        &self,
        old_value: Option<&T>,
        new_value: &T,
        last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> Result<Timestamp, RefreshError> {
        (**self).calculate_next_refresh_time(old_value, new_value, last_refresh_time, now)
    }
}

/// Adapts a closure into a [`RefreshTimeCalculator`].
///
/// The closure receives the whole [`Transition`] record.
///
/// # Example
///
/// ```
/// use refreshbox_core::{FnRefreshTimeCalculator, RefreshTimeCalculator, Timestamp};
/// use std::time::Duration;
///
/// // Short-lived empty results, long-lived everything else.
/// let calculator = FnRefreshTimeCalculator::new(|t: &refreshbox_core::Transition<'_, Vec<u8>>| {
///     let linger = if t.new_value().is_empty() { 1 } else { 60 };
///     Ok(t.now() + Duration::from_secs(linger))
/// });
///
/// let now = Timestamp::from_millis(0);
/// let next = calculator.calculate_next_refresh_time(None, &Vec::<u8>::new(), now, now).unwrap();
/// assert_eq!(next, Timestamp::from_millis(1_000));
/// ```
#[derive(Clone, Copy)]
pub struct FnRefreshTimeCalculator<F> {
    calculate: F,
}

impl<F> FnRefreshTimeCalculator<F> {
    /// Wraps `calculate` as a policy.
    pub fn new<T>(calculate: F) -> Self
    where
        T: ?Sized,
        F: Fn(&Transition<'_, T>) -> Result<Timestamp, RefreshError> + Send + Sync,
    {
        FnRefreshTimeCalculator { calculate }
    }
}

impl<F> std::fmt::Debug for FnRefreshTimeCalculator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnRefreshTimeCalculator")
            .field("calculate", &"...")
            .finish()
    }
}

impl<T, F> RefreshTimeCalculator<T> for FnRefreshTimeCalculator<F>
where
    T: ?Sized,
    F: Fn(&Transition<'_, T>) -> Result<Timestamp, RefreshError> + Send + Sync,
{
    fn calculate_next_refresh_time(
        &self,
        old_value: Option<&T>,
        new_value: &T,
        last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> Result<Timestamp, RefreshError> {
        let transition = Transition::new(old_value, new_value, last_refresh_time, now);
        (self.calculate)(&transition)
    }
}
