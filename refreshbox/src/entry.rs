//! Cached values with refresh metadata.
//!
//! [`RefreshEntry`] pairs a value with the time it was last refreshed and the
//! [`RefreshDue`] decision computed for it. It is the unit a cache engine
//! stores per key when it refreshes ahead of expiry.
//!
//! ## Refresh States
//!
//! The [`RefreshEntry::state`] method compares the decision with the current
//! time and returns:
//!
//! - [`RefreshState::Fresh`] - No refresh needed yet
//! - [`RefreshState::Due`] - The refresh should fire now
//!
//! ```
//! use refreshbox::{RefreshConfig, RefreshEntry, RefreshState, Timestamp};
//! use std::time::Duration;
//!
//! let schedule = RefreshConfig::builder()
//!     .linger(Duration::from_secs(10))
//!     .build()
//!     .schedule::<String>();
//!
//! let entry = RefreshEntry::load("v1".to_string(), Timestamp::from_millis(0), &schedule)?;
//!
//! match entry.state(Timestamp::from_millis(15_000)) {
//!     RefreshState::Fresh(entry) => println!("serve {}", entry.data()),
//!     RefreshState::Due(entry) => println!("serve {} and refresh", entry.data()),
//! }
//! # Ok::<(), refreshbox::RefreshError>(())
//! ```

use std::fmt;

use refreshbox_core::{RefreshError, Timestamp};

use crate::schedule::{RefreshDue, RefreshSchedule};

/// Freshness of a stored value relative to its refresh decision.
#[derive(Debug, PartialEq, Eq)]
pub enum RefreshState<E> {
    /// No refresh needed yet.
    Fresh(E),
    /// The refresh is due; the value is still usable.
    Due(E),
}

impl<E> RefreshState<E> {
    /// Returns the wrapped entry regardless of state.
    pub fn into_inner(self) -> E {
        match self {
            RefreshState::Fresh(entry) | RefreshState::Due(entry) => entry,
        }
    }
}

/// A cached value with its refresh metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshEntry<T> {
    data: T,
    refreshed_at: Timestamp,
    due: RefreshDue,
}

impl<T> RefreshEntry<T> {
    /// Creates an entry from already computed metadata.
    pub fn new(data: T, refreshed_at: Timestamp, due: RefreshDue) -> Self {
        RefreshEntry {
            data,
            refreshed_at,
            due,
        }
    }

    /// Stores a value loaded for the first time.
    ///
    /// Both the last refresh time and the current time are `now`.
    pub fn load(
        data: T,
        now: Timestamp,
        schedule: &RefreshSchedule<T>,
    ) -> Result<Self, RefreshError> {
        let due = schedule.schedule(None, Some(&data), now, now)?;
        Ok(Self::new(data, now, due))
    }

    /// Returns a reference to the cached data.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// When the data was last refreshed.
    #[inline]
    pub fn refreshed_at(&self) -> Timestamp {
        self.refreshed_at
    }

    /// When the data is due for refresh.
    #[inline]
    pub fn due(&self) -> RefreshDue {
        self.due
    }

    /// Returns `true` if a refresh should fire at `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.due.is_due(now)
    }

    /// Consumes the entry and returns the inner data.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Consumes the entry and returns metadata and data separately.
    pub fn into_parts(self) -> (RefreshMeta, T) {
        (RefreshMeta::new(self.refreshed_at, self.due), self.data)
    }

    /// Check the refresh state at `now`.
    ///
    /// Returns `RefreshState<RefreshEntry<T>>` preserving the entry.
    pub fn state(self, now: Timestamp) -> RefreshState<Self> {
        if self.due.is_due(now) {
            RefreshState::Due(self)
        } else {
            RefreshState::Fresh(self)
        }
    }

    /// Replaces the data with a newly produced value.
    ///
    /// The current data is passed to the schedule as the old value. On
    /// failure the untouched entry comes back inside [`RefreshFailure`], so
    /// the caller can keep serving it or drop it.
    pub fn refresh(
        self,
        new_value: Option<T>,
        now: Timestamp,
        schedule: &RefreshSchedule<T>,
    ) -> Result<Self, RefreshFailure<T>> {
        let scheduled =
            schedule.schedule(Some(&self.data), new_value.as_ref(), self.refreshed_at, now);
        match (scheduled, new_value) {
            (Ok(due), Some(data)) => Ok(Self::new(data, now, due)),
            (Ok(_), None) => Err(RefreshFailure {
                previous: self,
                source: RefreshError::InvalidArgument("new value must be present"),
            }),
            (Err(source), _) => {
                tracing::debug!(error = ?source, "Refresh failed, keeping previous value");
                Err(RefreshFailure {
                    previous: self,
                    source,
                })
            }
        }
    }
}

/// Refresh metadata without the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshMeta {
    /// When the data was last refreshed.
    pub refreshed_at: Timestamp,
    /// When the data is due for refresh.
    pub due: RefreshDue,
}

impl RefreshMeta {
    /// Creates new refresh metadata.
    pub fn new(refreshed_at: Timestamp, due: RefreshDue) -> RefreshMeta {
        RefreshMeta { refreshed_at, due }
    }
}

/// A failed [`RefreshEntry::refresh`], carrying the entry that was kept.
#[derive(Debug)]
pub struct RefreshFailure<T> {
    /// The entry as it was before the refresh attempt.
    pub previous: RefreshEntry<T>,
    /// Why the computation failed.
    pub source: RefreshError,
}

impl<T> fmt::Display for RefreshFailure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "refresh time computation failed: {}", self.source)
    }
}

impl<T: fmt::Debug> std::error::Error for RefreshFailure<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl<T> RefreshFailure<T> {
    /// Returns the previous entry, discarding the error.
    pub fn into_previous(self) -> RefreshEntry<T> {
        self.previous
    }
}
