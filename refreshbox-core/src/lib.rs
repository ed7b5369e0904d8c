#![warn(missing_docs)]
//! # refreshbox-core
//!
//! Core traits and types for deciding *when* a cached value is due for
//! refresh.
//!
//! A refresh-ahead cache recomputes values before readers see them go stale.
//! Every time an entry's value changes, the cache engine asks a
//! [`RefreshTimeCalculator`] for the absolute time the new value should be
//! refreshed, stores that time alongside the value, and schedules the next
//! refresh from it.
//!
//! ## Architecture
//!
//! This crate provides:
//!
//! - **Contract** - [`RefreshTimeCalculator`], invoked once per value transition
//! - **Capability** - [`NextRefreshTime`] lets a value report its own refresh
//!   time, detected through [`RefreshCapability`]
//! - **Policies** - [`AutoRefreshCalculator`] (default), [`LingerRefreshCalculator`],
//!   [`NeverRefreshCalculator`], [`FnRefreshTimeCalculator`]
//! - **Time** - [`Timestamp`] with the [`Timestamp::NEVER`] sentinel
//!
//! Storage, eviction, loaders and the refresh scheduler itself live in the
//! cache engine; see the `refreshbox` crate for configuration and for turning
//! a computed time into a scheduling decision.
//!
//! ## Feature Flags
//!
//! - `bytes` - Implement [`RefreshCapability`] for `bytes::Bytes`
//!

pub mod calculator;
pub mod capability;
pub mod error;
pub mod policy;
pub mod time;
pub mod transition;

pub use calculator::{
    BoxRefreshTimeCalculator, FnRefreshTimeCalculator, RefreshTimeCalculator,
    SharedRefreshTimeCalculator,
};
pub use capability::{NextRefreshTime, RefreshCapability, WithNextRefreshTime};
pub use error::RefreshError;
pub use policy::{AutoRefreshCalculator, LingerRefreshCalculator, NeverRefreshCalculator};
pub use time::Timestamp;
pub use transition::Transition;
