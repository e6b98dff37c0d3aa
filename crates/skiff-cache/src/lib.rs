//! Versioned cache storage for Skiff.
//!
//! Cached responses live in named partitions derived from a version token
//! (`"{version}:{label}"`). The host's cache backend sits behind the
//! [`CacheStore`] trait; [`MemoryStore`] is the in-process reference
//! implementation. [`CacheLifecycle`] drives the install/activate phases
//! that populate the offline partition and prune stale versions.

mod lifecycle;
mod memory;
mod store;
mod version;

pub use lifecycle::*;
pub use memory::*;
pub use store::*;
pub use version::*;
