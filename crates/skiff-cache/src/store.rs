//! Cache store abstraction.

use async_trait::async_trait;
use skiff_core::{Request, Response};

use crate::version::PartitionName;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation errors.
///
/// A lookup miss is not an error; misses are reported as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Storage quota exhausted.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// Backend storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Host-provided response store, keyed by partition name and request
/// identity (method plus URL).
///
/// Writes are unsynchronized overwrites: when two writers race on the same
/// key, the last write wins and the earlier entry is replaced whole.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Store a response under the request's identity, creating the
    /// partition if needed and overwriting any previous entry.
    async fn put(
        &self,
        partition: &PartitionName,
        request: &Request,
        response: Response,
    ) -> StoreResult<()>;

    /// Look up a response within a single partition.
    async fn lookup(
        &self,
        partition: &PartitionName,
        request: &Request,
    ) -> StoreResult<Option<Response>>;

    /// Look up a response across every partition, in unspecified partition
    /// order; the first hit wins.
    async fn lookup_any(&self, request: &Request) -> StoreResult<Option<Response>>;

    /// Drop an entire partition and everything in it. Returns whether the
    /// partition existed.
    async fn remove_partition(&self, partition: &PartitionName) -> StoreResult<bool>;

    /// List every partition currently present, including ones created by
    /// earlier versions.
    async fn partitions(&self) -> StoreResult<Vec<PartitionName>>;
}
