//! Turning a computed refresh time into a scheduling decision.
//!
//! A [`RefreshTimeCalculator`] returns a raw [`Timestamp`]: possibly in the
//! past, possibly before the previous refresh, possibly the "never" sentinel.
//! [`RefreshSchedule`] is the engine-side step that interprets it:
//!
//! - `NEVER` becomes `now + default_linger` when a default linger is
//!   configured, otherwise [`RefreshDue::Never`]
//! - a time at or before `now` becomes [`RefreshDue::Immediately`]
//! - anything else becomes [`RefreshDue::At`], even when the clock went
//!   backwards and the time lies before the last refresh
//!
//! A result before the last refresh on a forward-moving clock is logged at
//! `debug`; it is already in the past, so it is never rejected.

use std::fmt;
use std::time::Duration;

use refreshbox_core::{
    RefreshError, RefreshTimeCalculator, SharedRefreshTimeCalculator, Timestamp, Transition,
};
use tracing::debug;

/// When an entry should be refreshed next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshDue {
    /// The value is already stale; refresh as soon as possible.
    Immediately,
    /// Refresh at the given time.
    At(Timestamp),
    /// No automatic refresh.
    Never,
}

impl RefreshDue {
    /// Returns `true` if a refresh should fire at `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        match *self {
            RefreshDue::Immediately => true,
            RefreshDue::At(at) => at <= now,
            RefreshDue::Never => false,
        }
    }

    /// The scheduled time, if any.
    pub fn at(&self) -> Option<Timestamp> {
        match *self {
            RefreshDue::At(at) => Some(at),
            _ => None,
        }
    }

    /// Time left until the refresh fires.
    ///
    /// `Some(Duration::ZERO)` when already due, `None` when never.
    pub fn remaining(&self, now: Timestamp) -> Option<Duration> {
        match *self {
            RefreshDue::Immediately => Some(Duration::ZERO),
            RefreshDue::At(at) => Some(at.saturating_duration_since(now)),
            RefreshDue::Never => None,
        }
    }
}

/// A cache instance's refresh policy: one shared calculator plus the
/// default linger.
///
/// Cloning is cheap; every clone shares the same calculator.
///
/// # Example
///
/// ```
/// use refreshbox::{RefreshConfig, RefreshDue, Timestamp};
/// use std::time::Duration;
///
/// let schedule = RefreshConfig::builder()
///     .default_linger(Duration::from_secs(60))
///     .build()
///     .schedule::<String>();
///
/// let now = Timestamp::from_millis(1_000);
/// let value = String::from("plain value");
/// let due = schedule.schedule(None, Some(&value), now, now)?;
///
/// assert_eq!(due, RefreshDue::At(Timestamp::from_millis(61_000)));
/// # Ok::<(), refreshbox::RefreshError>(())
/// ```
pub struct RefreshSchedule<T: ?Sized> {
    calculator: SharedRefreshTimeCalculator<T>,
    default_linger: Option<Duration>,
}

impl<T: ?Sized> RefreshSchedule<T> {
    /// Creates a schedule around `calculator` with no default linger.
    pub fn new(calculator: SharedRefreshTimeCalculator<T>) -> Self {
        RefreshSchedule {
            calculator,
            default_linger: None,
        }
    }

    /// Sets the linger applied when the calculator answers "never".
    pub fn with_default_linger(self, linger: Duration) -> Self {
        RefreshSchedule {
            default_linger: Some(linger),
            ..self
        }
    }

    /// The shared calculator.
    pub fn calculator(&self) -> &SharedRefreshTimeCalculator<T> {
        &self.calculator
    }

    /// The default linger, if configured.
    pub fn default_linger(&self) -> Option<Duration> {
        self.default_linger
    }

    /// Decides when the new value of an entry is due for refresh.
    ///
    /// Call once per value transition, after the new value is produced and
    /// before it becomes visible to readers.
    ///
    /// # Errors
    ///
    /// - [`RefreshError::InvalidArgument`] if `new_value` is absent
    /// - any error returned by the calculator, unchanged
    #[tracing::instrument(skip(self, old_value, new_value), level = "trace")]
    pub fn schedule(
        &self,
        old_value: Option<&T>,
        new_value: Option<&T>,
        last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> Result<RefreshDue, RefreshError> {
        let transition = Transition::try_new(old_value, new_value, last_refresh_time, now)?;
        let next = transition.calculate(&*self.calculator)?;
        Ok(self.resolve(next, last_refresh_time, now))
    }

    /// Interprets a raw calculator result.
    ///
    /// Only the comparison with `now` decides whether a time is past.
    pub fn resolve(
        &self,
        next: Timestamp,
        last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> RefreshDue {
        let due = if next.is_never() {
            match self.default_linger {
                Some(linger) => due_at(now + linger, now),
                None => RefreshDue::Never,
            }
        } else {
            if next < last_refresh_time && last_refresh_time <= now {
                debug!(
                    %next,
                    %last_refresh_time,
                    "Refresh time precedes the last refresh"
                );
            }
            due_at(next, now)
        };
        debug!(%next, %now, ?due, "Refresh scheduled");
        due
    }
}

fn due_at(at: Timestamp, now: Timestamp) -> RefreshDue {
    if at.is_never() {
        RefreshDue::Never
    } else if at <= now {
        RefreshDue::Immediately
    } else {
        RefreshDue::At(at)
    }
}

impl<T: ?Sized> Clone for RefreshSchedule<T> {
    fn clone(&self) -> Self {
        Self {
            calculator: self.calculator.clone(),
            default_linger: self.default_linger,
        }
    }
}

impl<T: ?Sized> fmt::Debug for RefreshSchedule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshSchedule")
            .field("calculator", &"...")
            .field("default_linger", &self.default_linger)
            .finish()
    }
}

impl<T> From<SharedRefreshTimeCalculator<T>> for RefreshSchedule<T>
where
    T: ?Sized,
{
    fn from(calculator: SharedRefreshTimeCalculator<T>) -> Self {
        Self::new(calculator)
    }
}

impl<T> RefreshTimeCalculator<T> for RefreshSchedule<T>
where
    T: ?Sized,
{
    fn calculate_next_refresh_time(
        &self,
        old_value: Option<&T>,
        new_value: &T,
        last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> Result<Timestamp, RefreshError> {
        self.calculator
            .calculate_next_refresh_time(old_value, new_value, last_refresh_time, now)
    }
}
