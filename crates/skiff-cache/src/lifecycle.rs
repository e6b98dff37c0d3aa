//! Install and activate lifecycle phases.

use futures::future::try_join_all;
use http::StatusCode;
use skiff_core::{ClientHub, Fetch, FetchError, Request};
use tracing::{debug, info};

use crate::store::{CacheStore, StoreError};
use crate::version::{CacheVersion, PartitionKind, PartitionName};

/// Errors that abort an install.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// An offline resource could not be fetched.
    #[error("failed to fetch offline resource {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// An offline resource resolved outside the 2xx range.
    #[error("offline resource {url} returned status {status}")]
    BadStatus { url: String, status: StatusCode },

    /// The store rejected a write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Number of offline resources stored.
    pub resources_cached: usize,
    /// Whether the instance asked to activate without waiting for old
    /// instances to wind down.
    pub skip_waiting: bool,
}

/// Outcome of activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateReport {
    /// Whether open clients were claimed.
    pub claimed: bool,
    /// Stale partitions removed during pruning.
    pub partitions_removed: Vec<PartitionName>,
}

/// Drives the install and activate phases for one cache version.
///
/// The lifecycle is a linear state machine: install populates the offline
/// partition, activate claims clients and prunes other versions. There are
/// no retries and no rollback; an install failure simply propagates to the
/// host, which will retry the whole phase on the next registration.
pub struct CacheLifecycle {
    version: CacheVersion,
    offline_resources: Vec<String>,
}

impl CacheLifecycle {
    /// Create a lifecycle manager for a version and its offline resource set.
    pub fn new(version: CacheVersion, offline_resources: Vec<String>) -> Self {
        Self {
            version,
            offline_resources,
        }
    }

    /// The version this lifecycle manages.
    pub fn version(&self) -> &CacheVersion {
        &self.version
    }

    /// Partition holding the resources pre-fetched at install.
    pub fn offline_partition(&self) -> PartitionName {
        PartitionName::compose(&self.version, PartitionKind::Offline)
    }

    /// Partition capturing responses while browsing.
    pub fn resources_partition(&self) -> PartitionName {
        PartitionName::compose(&self.version, PartitionKind::Resources)
    }

    /// Populate the offline partition.
    ///
    /// Every configured resource is fetched concurrently. If any fetch
    /// fails or resolves outside the 2xx range the install aborts and
    /// nothing is stored. On success the report carries `skip_waiting`,
    /// asking the host to activate this instance immediately.
    pub async fn install<S, F>(&self, store: &S, fetcher: &F) -> Result<InstallReport, InstallError>
    where
        S: CacheStore,
        F: Fetch,
    {
        let partition = self.offline_partition();

        let fetches = self.offline_resources.iter().map(|url| async move {
            let request = Request::get(url.as_str());
            match fetcher.fetch(&request).await {
                Ok(response) if response.ok() => Ok((request, response)),
                Ok(response) => Err(InstallError::BadStatus {
                    url: url.clone(),
                    status: response.status(),
                }),
                Err(source) => Err(InstallError::Fetch {
                    url: url.clone(),
                    source,
                }),
            }
        });
        let fetched = try_join_all(fetches).await?;

        let resources_cached = fetched.len();
        for (request, response) in fetched {
            if let Err(e) = store.put(&partition, &request, response).await {
                // Discard the partial partition so a failed install leaves
                // no trace.
                let _ = store.remove_partition(&partition).await;
                return Err(InstallError::Store(e));
            }
        }

        info!(
            version = %self.version,
            resources = resources_cached,
            "offline partition installed"
        );
        Ok(InstallReport {
            resources_cached,
            skip_waiting: true,
        })
    }

    /// Claim open clients and prune partitions left by other versions.
    ///
    /// Claiming and pruning run concurrently; the phase completes only
    /// once every stale partition is gone.
    pub async fn activate<S, C>(&self, store: &S, clients: &C) -> Result<ActivateReport, StoreError>
    where
        S: CacheStore,
        C: ClientHub,
    {
        let ((), pruned) = tokio::join!(clients.claim(), self.prune(store));
        let partitions_removed = pruned?;

        info!(
            version = %self.version,
            removed = partitions_removed.len(),
            "activated"
        );
        Ok(ActivateReport {
            claimed: true,
            partitions_removed,
        })
    }

    async fn prune<S: CacheStore>(&self, store: &S) -> Result<Vec<PartitionName>, StoreError> {
        let stale: Vec<PartitionName> = store
            .partitions()
            .await?
            .into_iter()
            .filter(|name| !name.belongs_to(&self.version))
            .collect();

        try_join_all(stale.iter().map(|name| store.remove_partition(name))).await?;

        for name in &stale {
            debug!(partition = %name, "pruned stale cache partition");
        }
        Ok(stale)
    }
}
