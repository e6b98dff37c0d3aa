//! Fetch/cache strategies.

use std::sync::Arc;

use skiff_cache::{CacheStore, PartitionName};
use skiff_core::{Fetch, FetchError, Request, Response};
use tracing::{debug, warn};

use crate::classify::Classification;
use crate::fallback::FallbackProvider;

/// Runs the caching strategies against the store and network.
///
/// Every strategy terminates in a response; failures along the way recover
/// through the cache and finally the fallback provider.
pub struct FetchStrategies<S> {
    store: Arc<S>,
    fallback: FallbackProvider,
    write_partition: PartitionName,
}

impl<S> FetchStrategies<S>
where
    S: CacheStore + 'static,
{
    /// Create the strategy runner.
    ///
    /// The store is shared because detached cache writes outlive the
    /// request that spawned them.
    pub fn new(store: Arc<S>, fallback: FallbackProvider, write_partition: PartitionName) -> Self {
        Self {
            store,
            fallback,
            write_partition,
        }
    }

    /// Run the strategy selected for a classification.
    pub async fn run<F: Fetch>(
        &self,
        classification: Classification,
        fetcher: &F,
        request: &Request,
    ) -> Response {
        match classification {
            Classification::AlwaysFetch => self.network_first(fetcher, request).await,
            Classification::NeverCache => self.network_first_uncached(fetcher, request).await,
            Classification::FetchAndCache => self.fetch_and_cache(fetcher, request).await,
            Classification::CacheFirst => self.cache_first(fetcher, request).await,
        }
    }

    /// Network first: live response when reachable, cached copy when not,
    /// fallback when neither exists.
    pub async fn network_first<F: Fetch>(&self, fetcher: &F, request: &Request) -> Response {
        match self.fetch_and_store(fetcher, request, true).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %request.url(), error = %e, "live request failed, recovering from cache");
                self.cached_or_fallback(request).await
            }
        }
    }

    /// Network first without the cache write, for requests that must never
    /// be stored.
    pub async fn network_first_uncached<F: Fetch>(
        &self,
        fetcher: &F,
        request: &Request,
    ) -> Response {
        match self.fetch_and_store(fetcher, request, false).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %request.url(), error = %e, "live request failed, recovering from cache");
                self.cached_or_fallback(request).await
            }
        }
    }

    /// Fetch live and capture into the cache; recover from cache, then
    /// fallback, when the network is down.
    pub async fn fetch_and_cache<F: Fetch>(&self, fetcher: &F, request: &Request) -> Response {
        match self.fetch_and_store(fetcher, request, true).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %request.url(), error = %e, "page fetch failed, recovering from cache");
                self.cached_or_fallback(request).await
            }
        }
    }

    /// Cache first: a hit is served without touching the network; a miss
    /// is fetched and captured; a miss with the network down falls back.
    pub async fn cache_first<F: Fetch>(&self, fetcher: &F, request: &Request) -> Response {
        match self.store.lookup_any(request).await {
            Ok(Some(response)) => {
                debug!(method = %request.method(), url = %request.url(), "served from cache");
                return response;
            }
            Ok(None) => {
                debug!(method = %request.method(), url = %request.url(), "cache miss, trying network");
            }
            Err(e) => {
                warn!(url = %request.url(), error = %e, "cache lookup failed, trying network");
            }
        }

        match self.fetch_and_store(fetcher, request, true).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %request.url(), error = %e, "network down after cache miss");
                self.fallback.fallback(self.store.as_ref(), request).await
            }
        }
    }

    async fn fetch_and_store<F: Fetch>(
        &self,
        fetcher: &F,
        request: &Request,
        cache: bool,
    ) -> Result<Response, FetchError> {
        let response = fetcher.fetch(request).await?;
        if cache {
            self.spawn_cache_write(request, &response);
            debug!(
                method = %request.method(),
                url = %request.url(),
                status = %response.status(),
                "served from network, cache write queued"
            );
        } else {
            debug!(method = %request.method(), url = %request.url(), "served from network");
        }
        Ok(response)
    }

    /// Queue a best-effort write of a copy of the response.
    ///
    /// The write is detached: the response goes back to the client without
    /// waiting for it, and a failed write only logs.
    fn spawn_cache_write(&self, request: &Request, response: &Response) {
        let copy = response.duplicate();
        let store = Arc::clone(&self.store);
        let partition = self.write_partition.clone();
        let request = request.clone();
        tokio::spawn(async move {
            if let Err(e) = store.put(&partition, &request, copy).await {
                warn!(url = %request.url(), error = %e, "detached cache write failed");
            }
        });
    }

    async fn cached_or_fallback(&self, request: &Request) -> Response {
        match self.store.lookup_any(request).await {
            Ok(Some(response)) => {
                debug!(method = %request.method(), url = %request.url(), "served from cache");
                response
            }
            Ok(None) => self.fallback.fallback(self.store.as_ref(), request).await,
            Err(e) => {
                warn!(url = %request.url(), error = %e, "cache lookup failed");
                self.fallback.fallback(self.store.as_ref(), request).await
            }
        }
    }
}
