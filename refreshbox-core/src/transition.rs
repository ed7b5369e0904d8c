//! The value transition record.
//!
//! A [`Transition`] is what a cache engine hands to a refresh policy each
//! time an entry's value changes. It borrows everything from the caller and
//! lives only for the duration of one calculation.

use std::fmt;
use std::time::Duration;

use crate::calculator::RefreshTimeCalculator;
use crate::error::RefreshError;
use crate::time::Timestamp;

/// One old value to new value transition of a cache entry.
///
/// # Example
///
/// ```
/// use refreshbox_core::{AutoRefreshCalculator, Timestamp, Transition};
///
/// let new_value = String::from("fresh");
/// let transition = Transition::try_new(
///     None,
///     Some(&new_value),
///     Timestamp::from_millis(1_000),
///     Timestamp::from_millis(2_000),
/// )?;
///
/// assert_eq!(transition.calculate(&AutoRefreshCalculator::new())?, Timestamp::NEVER);
/// # Ok::<(), refreshbox_core::RefreshError>(())
/// ```
pub struct Transition<'a, T: ?Sized> {
    old_value: Option<&'a T>,
    new_value: &'a T,
    last_refresh_time: Timestamp,
    now: Timestamp,
}

impl<'a, T: ?Sized> Transition<'a, T> {
    /// Creates a transition record.
    pub fn new(
        old_value: Option<&'a T>,
        new_value: &'a T,
        last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> Self {
        Transition {
            old_value,
            new_value,
            last_refresh_time,
            now,
        }
    }

    /// Creates a transition record, failing if the new value is absent.
    ///
    /// This is the checked entry point for engines that hold the new value
    /// as an `Option`. An absent value is rejected rather than coerced.
    pub fn try_new(
        old_value: Option<&'a T>,
        new_value: Option<&'a T>,
        last_refresh_time: Timestamp,
        now: Timestamp,
    ) -> Result<Self, RefreshError> {
        let new_value =
            new_value.ok_or(RefreshError::InvalidArgument("new value must be present"))?;
        Ok(Self::new(old_value, new_value, last_refresh_time, now))
    }

    /// The value being replaced, absent on first load.
    #[inline]
    pub fn old_value(&self) -> Option<&'a T> {
        self.old_value
    }

    /// The value about to be stored.
    #[inline]
    pub fn new_value(&self) -> &'a T {
        self.new_value
    }

    /// When the entry was last refreshed.
    #[inline]
    pub fn last_refresh_time(&self) -> Timestamp {
        self.last_refresh_time
    }

    /// Current time.
    #[inline]
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Returns `true` on first load.
    pub fn is_initial_load(&self) -> bool {
        self.old_value.is_none()
    }

    /// Time since the last refresh, clamped at zero.
    pub fn elapsed(&self) -> Duration {
        self.now.saturating_duration_since(self.last_refresh_time)
    }

    /// Runs `calculator` on this transition.
    pub fn calculate<C>(&self, calculator: &C) -> Result<Timestamp, RefreshError>
    where
        C: RefreshTimeCalculator<T> + ?Sized,
    {
        calculator.calculate_next_refresh_time(
            self.old_value,
            self.new_value,
            self.last_refresh_time,
            self.now,
        )
    }
}

impl<T: ?Sized> Clone for Transition<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Transition<'_, T> {}

impl<T: ?Sized> fmt::Debug for Transition<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("initial_load", &self.is_initial_load())
            .field("last_refresh_time", &self.last_refresh_time)
            .field("now", &self.now)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_missing_value() {
        let result = Transition::<str>::try_new(
            Some("old"),
            None,
            Timestamp::from_millis(0),
            Timestamp::from_millis(1),
        );
        assert!(matches!(result, Err(RefreshError::InvalidArgument(_))));
    }

    #[test]
    fn test_elapsed_clamps_backwards_clock() {
        let transition = Transition::new(
            None,
            "v",
            Timestamp::from_millis(5_000),
            Timestamp::from_millis(1_000),
        );
        assert_eq!(transition.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_elapsed() {
        let transition = Transition::new(
            Some("old"),
            "new",
            Timestamp::from_millis(1_000),
            Timestamp::from_millis(3_500),
        );
        assert_eq!(transition.elapsed(), Duration::from_millis(2_500));
        assert!(!transition.is_initial_load());
    }
}
