//! Bounded memo for encyclopedia lookups.
//!
//! Misses are cached as well as hits: a page with no usable thumbnail stays
//! that way for the life of the process, so asking again only costs a request.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// LRU of lookup key → thumbnail URL (or `None` for "looked, nothing usable").
pub struct LookupCache {
    inner: Mutex<LruCache<String, Option<String>>>,
}

impl LookupCache {
    /// A zero capacity is bumped to one entry.
    pub fn new(max_entries: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(cap)),
        }
    }

    /// `Some(result)` if `key` was looked up before.
    pub fn get(&self, key: &str) -> Option<Option<String>> {
        let mut cache = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(key).cloned()
    }

    pub fn put(&self, key: &str, value: Option<String>) {
        let mut cache = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl std::fmt::Debug for LookupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupCache").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caches_hits_and_misses() {
        let cache = LookupCache::new(4);
        cache.put("Narendra_Modi", Some("https://upload/x.jpg".into()));
        cache.put("Nobody", None);
        assert_eq!(cache.get("Narendra_Modi"), Some(Some("https://upload/x.jpg".into())));
        assert_eq!(cache.get("Nobody"), Some(None));
        assert_eq!(cache.get("Unseen"), None);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = LookupCache::new(2);
        cache.put("a", None);
        cache.put("b", None);
        let _ = cache.get("a");
        cache.put("c", None);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
    }

    #[test]
    fn test_zero_capacity_is_usable() {
        let cache = LookupCache::new(0);
        cache.put("k", None);
        assert_eq!(cache.len(), 1);
    }
}
