use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Bounded store of fetched page bodies, keyed by URL hash.
#[derive(Clone)]
pub struct PageCache {
    pages: Arc<DashMap<String, String>>,
    max_entries: usize,
}

impl PageCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            pages: Arc::new(DashMap::new()),
            max_entries,
        }
    }

    pub fn insert(&self, url: &str, body: String) {
        if self.max_entries == 0 {
            return;
        }
        if self.pages.len() >= self.max_entries {
            // full: drop an arbitrary quarter before inserting
            let to_remove: Vec<_> = self
                .pages
                .iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.pages.remove(&key);
            }
        }
        self.pages.insert(hash_url(url), body);
    }

    pub fn get(&self, url: &str) -> Option<String> {
        self.pages.get(&hash_url(url)).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn hash_url(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_and_miss() {
        let cache = PageCache::new(10);
        cache.insert("https://registry.example/Acme", "<html/>".to_string());
        assert_eq!(cache.get("https://registry.example/Acme").as_deref(), Some("<html/>"));
        assert!(cache.get("https://registry.example/Other").is_none());
    }

    #[test]
    fn test_eviction_keeps_bound() {
        let cache = PageCache::new(4);
        for i in 0..20 {
            cache.insert(&format!("u{}", i), String::new());
        }
        assert!(cache.len() <= 4);
        assert!(cache.get("u19").is_some());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = PageCache::new(0);
        cache.insert("u", String::new());
        assert!(cache.is_empty());
    }
}
