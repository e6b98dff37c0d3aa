//! In-memory store implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use http::Method;
use skiff_core::{Request, Response};

use crate::store::{CacheStore, StoreError, StoreResult};
use crate::version::PartitionName;

/// Identity of a stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    method: Method,
    url: String,
}

impl EntryKey {
    fn of(request: &Request) -> Self {
        Self {
            method: request.method().clone(),
            url: request.url().to_string(),
        }
    }
}

/// In-memory store backend, for tests, demos, and single-process hosts.
///
/// Partitions iterate in name order, so [`CacheStore::lookup_any`] and
/// [`CacheStore::partitions`] are deterministic here even though the trait
/// leaves the order unspecified.
#[derive(Default)]
pub struct MemoryStore {
    partitions: RwLock<BTreeMap<PartitionName, HashMap<EntryKey, Response>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all partitions.
    pub fn len(&self) -> usize {
        match self.partitions.read() {
            Ok(guard) => guard.values().map(|entries| entries.len()).sum(),
            Err(_) => 0,
        }
    }

    /// Whether the store holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn put(
        &self,
        partition: &PartitionName,
        request: &Request,
        response: Response,
    ) -> StoreResult<()> {
        let mut guard = self
            .partitions
            .write()
            .map_err(|e| StoreError::Storage(format!("lock poisoned: {}", e)))?;
        guard
            .entry(partition.clone())
            .or_default()
            .insert(EntryKey::of(request), response);
        Ok(())
    }

    async fn lookup(
        &self,
        partition: &PartitionName,
        request: &Request,
    ) -> StoreResult<Option<Response>> {
        let guard = self
            .partitions
            .read()
            .map_err(|e| StoreError::Storage(format!("lock poisoned: {}", e)))?;
        Ok(guard
            .get(partition)
            .and_then(|entries| entries.get(&EntryKey::of(request)))
            .map(Response::duplicate))
    }

    async fn lookup_any(&self, request: &Request) -> StoreResult<Option<Response>> {
        let guard = self
            .partitions
            .read()
            .map_err(|e| StoreError::Storage(format!("lock poisoned: {}", e)))?;
        let key = EntryKey::of(request);
        Ok(guard
            .values()
            .find_map(|entries| entries.get(&key))
            .map(Response::duplicate))
    }

    async fn remove_partition(&self, partition: &PartitionName) -> StoreResult<bool> {
        let mut guard = self
            .partitions
            .write()
            .map_err(|e| StoreError::Storage(format!("lock poisoned: {}", e)))?;
        Ok(guard.remove(partition).is_some())
    }

    async fn partitions(&self) -> StoreResult<Vec<PartitionName>> {
        let guard = self
            .partitions
            .read()
            .map_err(|e| StoreError::Storage(format!("lock poisoned: {}", e)))?;
        Ok(guard.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;

    fn partition(name: &str) -> PartitionName {
        PartitionName::from_raw(name)
    }

    fn page(body: &'static str) -> Response {
        Response::new(StatusCode::OK).with_body(body)
    }

    #[tokio::test]
    async fn test_put_then_lookup_serves_repeatedly() {
        let store = MemoryStore::new();
        let req = Request::get("/index.html");
        store
            .put(&partition("v1:offline"), &req, page("<html>shell</html>"))
            .await
            .unwrap();

        // The stored entry survives being served more than once.
        for _ in 0..2 {
            let hit = store.lookup(&partition("v1:offline"), &req).await.unwrap();
            assert_eq!(
                hit.map(Response::into_body),
                Some(Bytes::from("<html>shell</html>"))
            );
        }
    }

    #[tokio::test]
    async fn test_lookup_is_partition_scoped() {
        let store = MemoryStore::new();
        let req = Request::get("/a.css");
        store
            .put(&partition("v1:resources"), &req, page("body{}"))
            .await
            .unwrap();

        assert!(store
            .lookup(&partition("v1:offline"), &req)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .lookup(&partition("v1:resources"), &req)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_lookup_any_spans_partitions() {
        let store = MemoryStore::new();
        let offline = Request::get("/offline.html");
        let captured = Request::get("/article/42");
        store
            .put(&partition("v1:offline"), &offline, page("offline"))
            .await
            .unwrap();
        store
            .put(&partition("v1:resources"), &captured, page("article"))
            .await
            .unwrap();

        let hit = store.lookup_any(&captured).await.unwrap();
        assert_eq!(hit.map(Response::into_body), Some(Bytes::from("article")));
        assert!(store.lookup_any(&Request::get("/missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_identity_includes_method() {
        let store = MemoryStore::new();
        let get = Request::get("/api/items");
        store
            .put(&partition("v1:resources"), &get, page("listing"))
            .await
            .unwrap();

        let post = Request::new(Method::POST, "/api/items");
        assert!(store.lookup_any(&post).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_last_writer_wins() {
        let store = MemoryStore::new();
        let req = Request::get("/");
        let part = partition("v1:resources");
        store.put(&part, &req, page("first")).await.unwrap();
        store.put(&part, &req, page("second")).await.unwrap();

        let hit = store.lookup(&part, &req).await.unwrap();
        assert_eq!(hit.map(Response::into_body), Some(Bytes::from("second")));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_partition_reports_existence() {
        let store = MemoryStore::new();
        store
            .put(&partition("v1:offline"), &Request::get("/"), page("x"))
            .await
            .unwrap();

        assert!(store.remove_partition(&partition("v1:offline")).await.unwrap());
        assert!(!store.remove_partition(&partition("v1:offline")).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_partitions_lists_all_names() {
        let store = MemoryStore::new();
        let req = Request::get("/");
        store.put(&partition("v1:offline"), &req, page("a")).await.unwrap();
        store.put(&partition("v2:offline"), &req, page("b")).await.unwrap();

        let names = store.partitions().await.unwrap();
        assert_eq!(names, vec![partition("v1:offline"), partition("v2:offline")]);
    }
}
