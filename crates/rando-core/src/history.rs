//! Bounded log of past selections, owned by the running session.

use serde::Serialize;
use std::collections::VecDeque;
use std::time::SystemTime;

use crate::store::unix_secs;

/// Most recent visits kept.
pub const HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitRecord {
    pub url: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    /// True if the URL was already in the history when it was recorded.
    pub is_repeat: bool,
}

#[derive(Debug, Clone, Default)]
pub struct VisitHistory {
    records: VecDeque<VisitRecord>,
}

impl VisitHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a visit, evicting the oldest beyond `HISTORY_CAPACITY`.
    pub fn record(&mut self, url: &str, now: SystemTime) -> &VisitRecord {
        let is_repeat = self.contains(url);
        self.records.push_back(VisitRecord {
            url: url.to_string(),
            timestamp: unix_secs(now),
            is_repeat,
        });
        while self.records.len() > HISTORY_CAPACITY {
            self.records.pop_front();
        }
        &self.records[self.records.len() - 1]
    }

    pub fn contains(&self, url: &str) -> bool {
        self.records.iter().any(|r| r.url == url)
    }

    /// The last `n` visits, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &VisitRecord> {
        self.records.iter().skip(self.records.len().saturating_sub(n))
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisitRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&VisitRecord> {
        self.records.back()
    }

    pub fn repeat_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_repeat).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_exceeds_capacity() {
        let mut h = VisitHistory::new();
        let now = SystemTime::now();
        for i in 0..(HISTORY_CAPACITY + 25) {
            h.record(&format!("https://site{i}.com"), now);
        }
        assert_eq!(h.len(), HISTORY_CAPACITY);
        assert_eq!(h.iter().next().unwrap().url, "https://site25.com");
    }

    #[test]
    fn marks_repeats() {
        let mut h = VisitHistory::new();
        let now = SystemTime::now();
        assert!(!h.record("https://a.com", now).is_repeat);
        assert!(!h.record("https://b.com", now).is_repeat);
        assert!(h.record("https://a.com", now).is_repeat);
        assert_eq!(h.repeat_count(), 1);
    }

    #[test]
    fn recent_returns_tail() {
        let mut h = VisitHistory::new();
        let now = SystemTime::now();
        for u in ["a", "b", "c", "d"] {
            h.record(u, now);
        }
        let tail: Vec<&str> = h.recent(2).map(|r| r.url.as_str()).collect();
        assert_eq!(tail, ["c", "d"]);
        assert_eq!(h.recent(10).count(), 4);
    }
}
