//! Values that know their own refresh time.
//!
//! A cached value may carry its own staleness horizon, typically because it
//! was fetched together with a TTL from an upstream protocol response. Such a
//! value implements [`NextRefreshTime`], and the automatic policy trusts it
//! over any generic linger duration.
//!
//! Detection is an explicit capability query rather than a runtime type
//! test: every cacheable value type implements [`RefreshCapability`], and
//! only self-describing types override
//! [`as_next_refresh_time`](RefreshCapability::as_next_refresh_time).
//!
//! ```
//! use refreshbox_core::{NextRefreshTime, RefreshCapability, RefreshError, Timestamp};
//!
//! struct Quote {
//!     price: u64,
//!     valid_until: Timestamp,
//! }
//!
//! impl NextRefreshTime for Quote {
//!     fn next_refresh_time(&self) -> Result<Timestamp, RefreshError> {
//!         Ok(self.valid_until)
//!     }
//! }
//!
//! impl RefreshCapability for Quote {
//!     fn as_next_refresh_time(&self) -> Option<&dyn NextRefreshTime> {
//!         Some(self)
//!     }
//! }
//!
//! // Plain types opt in with an empty impl.
//! struct Plain;
//! impl RefreshCapability for Plain {}
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use crate::error::RefreshError;
use crate::time::Timestamp;

/// Capability of a value to report when it should be refreshed next.
///
/// Called synchronously on the population path, so implementations must be
/// cheap and free of side effects. Returning a time before "now" is allowed
/// and means the value is already stale.
pub trait NextRefreshTime {
    /// Absolute time at which this value is due for refresh.
    fn next_refresh_time(&self) -> Result<Timestamp, RefreshError>;
}

/// Capability query implemented by every value a refresh policy inspects.
///
/// The default implementation reports no capability, so plain types only
/// need an empty `impl`.
pub trait RefreshCapability {
    /// Returns the value's [`NextRefreshTime`] facet, if it has one.
    fn as_next_refresh_time(&self) -> Option<&dyn NextRefreshTime> {
        None
    }
}

macro_rules! no_refresh_capability {
    ($($ty:ty),* $(,)?) => {
        $(impl RefreshCapability for $ty {})*
    };
}

no_refresh_capability!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    str,
    String,
);

impl<T> RefreshCapability for [T] {}
impl<T> RefreshCapability for Vec<T> {}
impl<T> RefreshCapability for VecDeque<T> {}
impl<T, S> RefreshCapability for HashSet<T, S> {}
impl<K, V, S> RefreshCapability for HashMap<K, V, S> {}
impl<K, V> RefreshCapability for BTreeMap<K, V> {}

#[cfg(feature = "bytes")]
impl RefreshCapability for bytes::Bytes {}

impl<T> RefreshCapability for Option<T>
where
    T: RefreshCapability,
{
    fn as_next_refresh_time(&self) -> Option<&dyn NextRefreshTime> {
        self.as_ref().and_then(RefreshCapability::as_next_refresh_time)
    }
}

impl<T> RefreshCapability for &T
where
    T: RefreshCapability + ?Sized,
{
    fn as_next_refresh_time(&self) -> Option<&dyn NextRefreshTime> {
        (**self).as_next_refresh_time()
    }
}

impl<T> RefreshCapability for Box<T>
where
    T: RefreshCapability + ?Sized,
{
    fn as_next_refresh_time(&self) -> Option<&dyn NextRefreshTime> {
        (**self).as_next_refresh_time()
    }
}

impl<T> RefreshCapability for Arc<T>
where
    T: RefreshCapability + ?Sized,
{
    fn as_next_refresh_time(&self) -> Option<&dyn NextRefreshTime> {
        (**self).as_next_refresh_time()
    }
}

impl<T> RefreshCapability for Rc<T>
where
    T: RefreshCapability + ?Sized,
{
    fn as_next_refresh_time(&self) -> Option<&dyn NextRefreshTime> {
        (**self).as_next_refresh_time()
    }
}

impl<T> RefreshCapability for Cow<'_, T>
where
    T: RefreshCapability + ToOwned + ?Sized,
{
    fn as_next_refresh_time(&self) -> Option<&dyn NextRefreshTime> {
        (**self).as_next_refresh_time()
    }
}

/// A value bundled with the time it should be refreshed.
///
/// Use it for data fetched together with freshness metadata, for example a
/// response carrying `Cache-Control: max-age`.
///
/// # Example
///
/// ```
/// use refreshbox_core::{RefreshCapability, Timestamp, WithNextRefreshTime};
/// use std::time::Duration;
///
/// let fetched_at = Timestamp::from_millis(10_000);
/// let value = WithNextRefreshTime::from_ttl("payload", fetched_at, Duration::from_secs(60));
///
/// assert_eq!(value.data(), &"payload");
/// assert_eq!(value.refresh_at(), Timestamp::from_millis(70_000));
/// assert!(value.as_next_refresh_time().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithNextRefreshTime<T> {
    data: T,
    refresh_at: Timestamp,
}

impl<T> WithNextRefreshTime<T> {
    /// Wraps `data` with an absolute refresh time.
    pub fn new(data: T, refresh_at: Timestamp) -> Self {
        WithNextRefreshTime { data, refresh_at }
    }

    /// Wraps `data` that stays fresh for `ttl` after `fetched_at`.
    pub fn from_ttl(data: T, fetched_at: Timestamp, ttl: Duration) -> Self {
        Self::new(data, fetched_at + ttl)
    }

    /// Returns a reference to the wrapped data.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns the embedded refresh time.
    #[inline]
    pub fn refresh_at(&self) -> Timestamp {
        self.refresh_at
    }

    /// Consumes the wrapper and returns the data.
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T> NextRefreshTime for WithNextRefreshTime<T> {
    fn next_refresh_time(&self) -> Result<Timestamp, RefreshError> {
        Ok(self.refresh_at)
    }
}

impl<T> RefreshCapability for WithNextRefreshTime<T> {
    fn as_next_refresh_time(&self) -> Option<&dyn NextRefreshTime> {
        Some(self)
    }
}
