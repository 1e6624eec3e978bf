//! Bounded decision cache keyed by the exact (url, title, description) triple.

use std::collections::{HashMap, VecDeque};

use super::FilterDecision;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub url: String,
    pub title: String,
    pub description: String,
}

impl CacheKey {
    pub fn new(url: &str, title: &str, description: &str) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Insertion-ordered cache. When it grows past `capacity`, only the most
/// recently inserted `capacity / 2` entries are kept (at least one).
#[derive(Debug, Clone)]
pub struct DecisionCache {
    entries: HashMap<CacheKey, FilterDecision>,
    order: VecDeque<CacheKey>,
    capacity: usize,
}

impl DecisionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<&FilterDecision> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: CacheKey, decision: FilterDecision) {
        if self.entries.insert(key.clone(), decision).is_none() {
            self.order.push_back(key);
        }
        if self.entries.len() > self.capacity {
            // Never evict the entry that was just inserted.
            let keep = (self.capacity / 2).max(1);
            while self.order.len() > keep {
                if let Some(old) = self.order.pop_front() {
                    self.entries.remove(&old);
                }
            }
            tracing::debug!(kept = keep, "filter cache trimmed");
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterReason;

    fn key(i: usize) -> CacheKey {
        CacheKey::new(&format!("https://site{i}.com"), "", "")
    }

    #[test]
    fn overflow_keeps_most_recent_half() {
        let mut cache = DecisionCache::new(1000);
        for i in 0..1000 {
            cache.insert(key(i), FilterDecision::allow(FilterReason::PassedAllChecks));
        }
        assert_eq!(cache.len(), 1000);
        cache.insert(key(1000), FilterDecision::allow(FilterReason::PassedAllChecks));
        assert_eq!(cache.len(), 500);
        assert!(cache.get(&key(500)).is_none());
        assert!(cache.get(&key(501)).is_some());
        assert!(cache.get(&key(1000)).is_some());
    }

    #[test]
    fn capacity_one_keeps_latest_insert() {
        let mut cache = DecisionCache::new(1);
        cache.insert(key(0), FilterDecision::allow(FilterReason::PassedAllChecks));
        cache.insert(key(1), FilterDecision::allow(FilterReason::PassedAllChecks));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key(0)).is_none());
        assert!(cache.get(&key(1)).is_some());
    }

    #[test]
    fn key_is_exact_triple() {
        let mut cache = DecisionCache::new(10);
        cache.insert(
            CacheKey::new("https://a.com", "t", "d"),
            FilterDecision::block(FilterReason::BlockedKeyword),
        );
        assert!(cache.get(&CacheKey::new("https://a.com", "t", "d")).is_some());
        assert!(cache.get(&CacheKey::new("https://a.com", "t", "")).is_none());
        assert!(cache.get(&CacheKey::new("https://a.com", "", "d")).is_none());
    }
}
