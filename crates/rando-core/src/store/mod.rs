//! Durable client-side state.
//!
//! One JSON document under the XDG state dir holds everything that must
//! survive a restart: the remote counter id, the local fallback count, the
//! bounded validation and report logs, cached remote rule documents and the
//! user's blocklist edits. Session state (filter cache, visit history, rate
//! limiter) is not stored here.

mod persist;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::report::ContentReport;
use crate::validator::ValidationLogEntry;

/// Capacity of the validation and report logs.
pub const LOG_CAPACITY: usize = 100;

/// Seconds since the Unix epoch (0 for times before it).
pub fn unix_secs(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Cached blobs older than this are dropped when the state is saved.
pub const BLOB_TTL: Duration = Duration::from_secs(60 * 60);

/// A cached resource with the time it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedBlob {
    pub data: String,
    pub stored_at: u64,
}

impl CachedBlob {
    pub fn is_fresh(&self, now: SystemTime, ttl: Duration) -> bool {
        unix_secs(now).saturating_sub(self.stored_at) < ttl.as_secs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlocklistAction {
    Add,
    Remove,
}

/// A user edit to the blocklist, replayed on top of freshly loaded rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocklistOverride {
    pub action: BlocklistAction,
    pub domain: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub counter_id: Option<String>,
    pub fallback_count: u64,
    pub validation_log: VecDeque<ValidationLogEntry>,
    pub report_log: VecDeque<ContentReport>,
    pub cached_blobs: BTreeMap<String, CachedBlob>,
    pub blocklist_overrides: Vec<BlocklistOverride>,
}

fn push_bounded<T>(log: &mut VecDeque<T>, item: T) {
    log.push_back(item);
    while log.len() > LOG_CAPACITY {
        log.pop_front();
    }
}

/// Persisted state plus where it lives. `path == None` keeps it in memory only.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    path: Option<PathBuf>,
    state: PersistedState,
}

impl StateStore {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn counter_id(&self) -> Option<&str> {
        self.state.counter_id.as_deref()
    }

    pub fn set_counter_id(&mut self, id: Option<String>) {
        self.state.counter_id = id;
    }

    pub fn fallback_count(&self) -> u64 {
        self.state.fallback_count
    }

    pub fn set_fallback_count(&mut self, count: u64) {
        self.state.fallback_count = count;
    }

    pub fn push_validation(&mut self, entry: ValidationLogEntry) {
        push_bounded(&mut self.state.validation_log, entry);
    }

    pub fn validation_log(&self) -> &VecDeque<ValidationLogEntry> {
        &self.state.validation_log
    }

    pub fn push_report(&mut self, report: ContentReport) {
        push_bounded(&mut self.state.report_log, report);
    }

    pub fn reports(&self) -> &VecDeque<ContentReport> {
        &self.state.report_log
    }

    /// Cached data for `key` if it was stored less than `ttl` before `now`.
    pub fn cached_blob(&self, key: &str, now: SystemTime, ttl: Duration) -> Option<&str> {
        let blob = self.state.cached_blobs.get(key)?;
        blob.is_fresh(now, ttl).then_some(blob.data.as_str())
    }

    /// Drop cached blobs older than `ttl`; returns how many were removed.
    pub fn prune_expired_blobs(&mut self, now: SystemTime, ttl: Duration) -> usize {
        let before = self.state.cached_blobs.len();
        self.state.cached_blobs.retain(|_, blob| blob.is_fresh(now, ttl));
        before - self.state.cached_blobs.len()
    }

    pub fn put_blob(&mut self, key: &str, data: String, now: SystemTime) {
        self.state.cached_blobs.insert(
            key.to_string(),
            CachedBlob {
                data,
                stored_at: unix_secs(now),
            },
        );
    }

    /// Record a blocklist edit. Any earlier edit of the same (domain, category)
    /// is replaced so replaying removals before additions stays correct.
    pub fn record_blocklist_change(&mut self, action: BlocklistAction, domain: &str, category: &str) {
        self.state
            .blocklist_overrides
            .retain(|o| !(o.domain == domain && o.category == category));
        self.state.blocklist_overrides.push(BlocklistOverride {
            action,
            domain: domain.to_string(),
            category: category.to_string(),
        });
    }

    pub fn blocklist_overrides(&self) -> &[BlocklistOverride] {
        &self.state.blocklist_overrides
    }
}
