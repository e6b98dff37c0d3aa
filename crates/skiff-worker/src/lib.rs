//! Offline-first request interception for Skiff.
//!
//! The worker intercepts outgoing requests and answers each one through a
//! caching strategy chosen by classification:
//! - always-fetch patterns go to the network first, with cache recovery
//! - HTML navigations are fetched live and captured into the cache
//! - everything else is served cache-first
//!
//! When both network and cache fail, a fallback resource is served instead;
//! the fetch path as a whole never fails. Cache partitions are scoped to a
//! version token and pruned on activation.

mod classify;
mod config;
mod fallback;
mod notify;
mod strategy;
mod worker;

pub use classify::*;
pub use config::*;
pub use fallback::*;
pub use notify::*;
pub use strategy::*;
pub use worker::*;
