//! Mock remote store for testing.
//!
//! In-memory [`RemoteStore`] implementation with operation counters,
//! injectable per-operation latency (deterministic under a paused clock)
//! and toggleable failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::client::RemoteStore;
use super::error::{ManifestError, ManifestResult};

/// In-memory mock store.
///
/// # Example
///
/// ```rust,ignore
/// let store = MockRemoteStore::builder()
///     .with_object("reports/manifest.json", br#"{"dates":[]}"#.as_slice())
///     .with_get_latency(Duration::from_millis(50))
///     .build();
///
/// let data = store.get_object("reports/manifest.json").await?;
/// assert_eq!(store.get_count(), 1);
/// ```
pub(crate) struct MockRemoteStore {
    /// Storage for objects: key -> data.
    objects: RwLock<HashMap<String, Bytes>>,

    get_count: AtomicUsize,
    put_count: AtomicUsize,
    list_count: AtomicUsize,

    fail_gets: AtomicBool,
    fail_puts: AtomicBool,
    fail_lists: AtomicBool,

    get_latency: Duration,
    put_latency: Duration,
    list_latency: Duration,
}

impl MockRemoteStore {
    /// Create a new empty mock store.
    pub(crate) fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            get_count: AtomicUsize::new(0),
            put_count: AtomicUsize::new(0),
            list_count: AtomicUsize::new(0),
            fail_gets: AtomicBool::new(false),
            fail_puts: AtomicBool::new(false),
            fail_lists: AtomicBool::new(false),
            get_latency: Duration::ZERO,
            put_latency: Duration::ZERO,
            list_latency: Duration::ZERO,
        }
    }

    /// Start building a mock store with objects, latency and failures.
    pub(crate) fn builder() -> MockRemoteStoreBuilder {
        MockRemoteStoreBuilder::new()
    }

    /// Check if an object exists (synchronous, for assertions).
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.objects.read().unwrap().contains_key(key)
    }

    /// Get object data directly (synchronous, for assertions).
    pub(crate) fn get_data(&self, key: &str) -> Option<Bytes> {
        self.objects.read().unwrap().get(key).cloned()
    }

    /// Insert or replace an object without going through the trait.
    pub(crate) fn insert_object(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.objects.write().unwrap().insert(key.into(), data.into());
    }

    pub(crate) fn get_count(&self) -> usize {
        self.get_count.load(Ordering::Relaxed)
    }

    pub(crate) fn put_count(&self) -> usize {
        self.put_count.load(Ordering::Relaxed)
    }

    pub(crate) fn list_count(&self) -> usize {
        self.list_count.load(Ordering::Relaxed)
    }

    pub(crate) fn set_fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::Relaxed);
    }

    pub(crate) fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::Relaxed);
    }

    pub(crate) fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::Relaxed);
    }
}

impl Default for MockRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn get_object(&self, key: &str) -> ManifestResult<Bytes> {
        self.get_count.fetch_add(1, Ordering::Relaxed);
        if !self.get_latency.is_zero() {
            tokio::time::sleep(self.get_latency).await;
        }
        if self.fail_gets.load(Ordering::Relaxed) {
            return Err(ManifestError::transport("get_object", key, "injected failure"));
        }
        self.objects
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| ManifestError::ObjectNotFound {
                key: key.to_string(),
            })
    }

    async fn put_object(&self, key: &str, data: Bytes, _content_type: &str) -> ManifestResult<()> {
        self.put_count.fetch_add(1, Ordering::Relaxed);
        if !self.put_latency.is_zero() {
            tokio::time::sleep(self.put_latency).await;
        }
        if self.fail_puts.load(Ordering::Relaxed) {
            return Err(ManifestError::transport("put_object", key, "injected failure"));
        }
        self.objects.write().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn list_objects(&self, prefix: &str, max_keys: usize) -> ManifestResult<Vec<String>> {
        self.list_count.fetch_add(1, Ordering::Relaxed);
        if !self.list_latency.is_zero() {
            tokio::time::sleep(self.list_latency).await;
        }
        if self.fail_lists.load(Ordering::Relaxed) {
            return Err(ManifestError::transport("list_objects", prefix, "injected failure"));
        }
        let mut keys: Vec<String> = self
            .objects
            .read()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys.truncate(max_keys);
        Ok(keys)
    }
}

/// Builder for mock stores with test data.
pub(crate) struct MockRemoteStoreBuilder {
    store: MockRemoteStore,
}

impl MockRemoteStoreBuilder {
    pub(crate) fn new() -> Self {
        Self {
            store: MockRemoteStore::new(),
        }
    }

    /// Add an object.
    pub(crate) fn with_object(self, key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.store.insert_object(key, data);
        self
    }

    /// Delay every `get_object` by `latency`.
    pub(crate) fn with_get_latency(mut self, latency: Duration) -> Self {
        self.store.get_latency = latency;
        self
    }

    /// Delay every `put_object` by `latency`.
    pub(crate) fn with_put_latency(mut self, latency: Duration) -> Self {
        self.store.put_latency = latency;
        self
    }

    pub(crate) fn build(self) -> MockRemoteStore {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_put_get() {
        let store = MockRemoteStore::new();

        store
            .put_object("test/file.json", Bytes::from("{}"), "application/json")
            .await
            .unwrap();

        let data = store.get_object("test/file.json").await.unwrap();
        assert_eq!(&data[..], b"{}");
        assert_eq!(store.get_count(), 1);
        assert_eq!(store.put_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_not_found() {
        let store = MockRemoteStore::new();

        let result = store.get_object("nonexistent").await;
        assert!(matches!(result, Err(ManifestError::ObjectNotFound { .. })));
    }

    #[tokio::test]
    async fn test_mock_list_with_prefix_and_cap() {
        let store = MockRemoteStore::builder()
            .with_object("views/a", "1")
            .with_object("views/b", "2")
            .with_object("views/c", "3")
            .with_object("other/d", "4")
            .build();

        let keys = store.list_objects("views/", 10).await.unwrap();
        assert_eq!(keys, ["views/a", "views/b", "views/c"]);

        let capped = store.list_objects("views/", 2).await.unwrap();
        assert_eq!(capped, ["views/a", "views/b"]);
        assert_eq!(store.list_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let store = MockRemoteStore::new();
        store.insert_object("k", "v");

        store.set_fail_gets(true);
        assert!(matches!(
            store.get_object("k").await,
            Err(ManifestError::Transport { .. })
        ));

        store.set_fail_gets(false);
        assert!(store.get_object("k").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_latency_is_observable() {
        let store = MockRemoteStore::builder()
            .with_object("k", "v")
            .with_get_latency(Duration::from_millis(100))
            .build();

        let started = tokio::time::Instant::now();
        store.get_object("k").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
