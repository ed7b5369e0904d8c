#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # refreshbox
//!
//! Refresh-ahead scheduling for caches.
//!
//! A refresh-ahead cache recomputes a value before readers see it go stale.
//! This crate decides *when*: on every value transition the cache engine
//! calls [`RefreshSchedule::schedule`], which asks the configured
//! [`RefreshTimeCalculator`] for a refresh time and turns the answer into a
//! [`RefreshDue`] decision.
//!
//! ```
//! use refreshbox::prelude::*;
//! use std::time::Duration;
//!
//! // Values fetched with a TTL describe their own refresh time.
//! let schedule = RefreshConfig::default().schedule::<WithNextRefreshTime<String>>();
//!
//! let fetched_at = Timestamp::from_millis(0);
//! let value = WithNextRefreshTime::from_ttl("body".to_string(), fetched_at, Duration::from_secs(30));
//! let entry = RefreshEntry::load(value, fetched_at, &schedule)?;
//!
//! assert_eq!(entry.due(), RefreshDue::At(Timestamp::from_millis(30_000)));
//! # Ok::<(), RefreshError>(())
//! ```
//!
//! Storage, eviction, loaders and the timer that fires refreshes belong to
//! the cache engine and are not provided here.

/// Refresh policy configuration.
///
/// Defines [`RefreshConfig`](config::RefreshConfig) with:
/// - **Policy** - automatic, fixed linger, or never
/// - **Default linger** - applied when the policy answers "never"
pub mod config;

/// Cached values with refresh metadata.
pub mod entry;

/// Interpretation of computed refresh times.
///
/// Provides [`RefreshSchedule`](schedule::RefreshSchedule), which classifies past
/// times against the current clock and applies the default linger.
pub mod schedule;

pub use config::{RefreshConfig, RefreshConfigBuilder, RefreshPolicy};
pub use entry::{RefreshEntry, RefreshFailure, RefreshMeta, RefreshState};
pub use schedule::{RefreshDue, RefreshSchedule};

pub use refreshbox_core::{
    AutoRefreshCalculator, BoxRefreshTimeCalculator, FnRefreshTimeCalculator,
    LingerRefreshCalculator, NeverRefreshCalculator, NextRefreshTime, RefreshCapability,
    RefreshError, RefreshTimeCalculator, SharedRefreshTimeCalculator, Timestamp, Transition,
    WithNextRefreshTime,
};

/// Refresh policy traits and built-in calculators.
///
/// Re-exports from [`refreshbox-core`](https://docs.rs/refreshbox-core).
pub mod policy {
    pub use refreshbox_core::calculator::{
        BoxRefreshTimeCalculator, FnRefreshTimeCalculator, RefreshTimeCalculator,
        SharedRefreshTimeCalculator,
    };
    pub use refreshbox_core::capability::{
        NextRefreshTime, RefreshCapability, WithNextRefreshTime,
    };
    pub use refreshbox_core::policy::{
        AutoRefreshCalculator, LingerRefreshCalculator, NeverRefreshCalculator,
    };
}

/// The `refreshbox` prelude.
///
/// ```rust
/// use refreshbox::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        NextRefreshTime, RefreshCapability, RefreshConfig, RefreshDue, RefreshEntry,
        RefreshError, RefreshSchedule, RefreshState, RefreshTimeCalculator, Timestamp,
        WithNextRefreshTime,
    };
}
