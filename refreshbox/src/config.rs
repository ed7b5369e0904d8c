//! Refresh policy configuration.
//!
//! [`RefreshConfig`] picks the [`RefreshTimeCalculator`](refreshbox_core::RefreshTimeCalculator) a cache uses and the
//! default linger applied when that calculator answers "never". It is plain
//! data: build it in code with [`RefreshConfig::builder`] or deserialize it
//! from a configuration file.
//!
//! ```yaml
//! policy:
//!   type: Linger
//!   linger: 30s
//! default_linger: 5m
//! ```

use std::sync::Arc;
use std::time::Duration;

use refreshbox_core::{
    AutoRefreshCalculator, LingerRefreshCalculator, NeverRefreshCalculator, RefreshCapability,
    SharedRefreshTimeCalculator,
};
use serde::{Deserialize, Serialize};

use crate::schedule::RefreshSchedule;

/// Which refresh-time policy a cache uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
#[serde(tag = "type")]
pub enum RefreshPolicy {
    /// Self-describing values decide; others are never due (see [`AutoRefreshCalculator`]).
    #[default]
    Auto,
    /// Every value is due a fixed duration after it was stored.
    Linger {
        /// Duration after each transition (e.g., "30s", "500ms", "1m").
        #[serde(with = "humantime_serde")]
        linger: Duration,
    },
    /// The policy always answers "never"; the default linger still applies
    /// when configured.
    Never,
}

impl RefreshPolicy {
    /// Builds the shared calculator for this policy.
    ///
    /// `T` must implement [`RefreshCapability`] for every variant, since the
    /// policy is only known at runtime. Value types without a refresh time
    /// of their own need just the empty impl.
    pub fn calculator<T>(&self) -> SharedRefreshTimeCalculator<T>
    where
        T: RefreshCapability + ?Sized + 'static,
    {
        match *self {
            RefreshPolicy::Auto => Arc::new(AutoRefreshCalculator::new()),
            RefreshPolicy::Linger { linger } => Arc::new(LingerRefreshCalculator::new(linger)),
            RefreshPolicy::Never => Arc::new(NeverRefreshCalculator::new()),
        }
    }
}

/// Refresh configuration of one cache instance.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct RefreshConfig {
    /// Refresh-time policy.
    #[serde(default)]
    pub policy: RefreshPolicy,
    /// Linger applied when the policy returns "never" (e.g., "5m").
    /// None leaves such entries to external invalidation.
    #[serde(default, with = "humantime_serde")]
    pub default_linger: Option<Duration>,
}

impl RefreshConfig {
    /// Create a new builder for RefreshConfig.
    pub fn builder() -> RefreshConfigBuilder {
        RefreshConfigBuilder::default()
    }

    /// Builds the schedule for values of type `T`.
    ///
    /// Same [`RefreshCapability`] bound as [`RefreshPolicy::calculator`].
    pub fn schedule<T>(&self) -> RefreshSchedule<T>
    where
        T: RefreshCapability + ?Sized + 'static,
    {
        let schedule = RefreshSchedule::new(self.policy.calculator());
        match self.default_linger {
            Some(linger) => schedule.with_default_linger(linger),
            None => schedule,
        }
    }
}

/// Builder for RefreshConfig.
#[derive(Debug, Clone, Default)]
pub struct RefreshConfigBuilder {
    policy: RefreshPolicy,
    default_linger: Option<Duration>,
}

impl RefreshConfigBuilder {
    /// Set the refresh policy.
    pub fn policy(self, policy: RefreshPolicy) -> Self {
        Self { policy, ..self }
    }

    /// Use the linger policy with the given duration.
    pub fn linger(self, linger: Duration) -> Self {
        self.policy(RefreshPolicy::Linger { linger })
    }

    /// Set the default linger.
    pub fn default_linger(self, linger: Duration) -> Self {
        Self {
            default_linger: Some(linger),
            ..self
        }
    }

    /// Build the RefreshConfig.
    pub fn build(self) -> RefreshConfig {
        RefreshConfig {
            policy: self.policy,
            default_linger: self.default_linger,
        }
    }
}
