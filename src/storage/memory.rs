use super::byteview::ByteView;
use super::lru::LruCache;

use parking_lot::Mutex;

/// Thread-safe front for [`LruCache`], used as a group's local storage.
///
/// One lock covers the whole cache and is held only for a single `add` or
/// `get`. The underlying LRU is built on the first write.
#[derive(Debug)]
pub struct SyncCache {
    cache_bytes: i64,
    lru: Mutex<Option<LruCache<ByteView>>>,
}

impl SyncCache {
    pub fn new(cache_bytes: i64) -> Self {
        Self {
            cache_bytes,
            lru: Mutex::new(None),
        }
    }

    pub fn add(&self, key: &str, value: ByteView) {
        let mut lru = self.lru.lock();
        lru.get_or_insert_with(|| LruCache::new(self.cache_bytes, None))
            .add(key, value);
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut lru = self.lru.lock();
        lru.as_mut()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lru.lock().as_ref().map(|lru| lru.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bytes_used(&self) -> i64 {
        self.lru
            .lock()
            .as_ref()
            .map(|lru| lru.bytes_used())
            .unwrap_or(0)
    }

    /// True once the first `add` has built the LRU.
    pub fn is_initialized(&self) -> bool {
        self.lru.lock().is_some()
    }
}
