//! Filter engine: one allow/block decision per URL, in strict rule priority.
//!
//! Order: disabled → cache → whitelist → blocked domain → keyword →
//! suspicious TLD → blocked file extension → reputation. Internal errors fail
//! closed with `filtering_error`.

mod cache;
mod decision;
mod stats;

use crate::analyzer::{self, RiskLevel};
use crate::error::{DomainError, FilterError};
use crate::rules::{BulkItem, RuleSettings, RuleStore};

pub use cache::{CacheKey, DecisionCache};
pub use decision::{FilterDecision, FilterReason};
pub use stats::FilterStats;

/// Default number of cached decisions.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Rule store plus decision cache and statistics. All blacklist edits go
/// through the engine so the cache is cleared whenever the rules change.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    rules: RuleStore,
    cache: DecisionCache,
    stats: FilterStats,
}

/// Last path segment's extension, lowercase, if any. For schemeless input
/// only the part after the host counts as the path.
fn path_extension(url: &str) -> Option<String> {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => {
            let bare = url.split(['?', '#']).next().unwrap_or_default();
            let (_, rest) = bare.split_once('/')?;
            rest.to_string()
        }
    };
    let last = path.rsplit('/').next()?;
    let (_, ext) = last.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_lowercase())
}

impl FilterEngine {
    pub fn new(rules: RuleStore) -> Self {
        Self::with_capacity(rules, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(rules: RuleStore, capacity: usize) -> Self {
        Self {
            rules,
            cache: DecisionCache::new(capacity),
            stats: FilterStats::default(),
        }
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached decision; statistics are kept.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn set_settings(&mut self, settings: RuleSettings) {
        self.rules.set_settings(settings);
        self.cache.clear();
    }

    pub fn add_blocked_domain(&mut self, domain: &str, category: &str) -> Result<bool, DomainError> {
        let changed = self.rules.add_blocked_domain(domain, category)?;
        if changed {
            self.cache.clear();
        }
        Ok(changed)
    }

    pub fn remove_blocked_domain(&mut self, domain: &str, category: &str) -> Result<bool, DomainError> {
        let changed = self.rules.remove_blocked_domain(domain, category)?;
        if changed {
            self.cache.clear();
        }
        Ok(changed)
    }

    pub fn bulk_add_blocked_domains<S: AsRef<str>>(&mut self, domains: &[S], category: &str) -> Vec<BulkItem> {
        let report = self.rules.bulk_add_blocked_domains(domains, category);
        if report.iter().any(|item| item.outcome == Ok(true)) {
            self.cache.clear();
        }
        report
    }

    /// Classify `url` (with optional page title and description).
    pub fn evaluate(&mut self, url: &str, title: &str, description: &str) -> FilterDecision {
        let settings = self.rules.settings();
        if !settings.enabled {
            return FilterDecision::allow(FilterReason::FilteringDisabled);
        }

        let key = CacheKey::new(url, title, description);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        let decision = match self.decide(url, title, description) {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(%url, "filter evaluation failed, blocking: {e}");
                FilterDecision::block(FilterReason::FilteringError).with_details(e.to_string())
            }
        };

        if !decision.allowed {
            if settings.log_filtered_content {
                tracing::info!(%url, reason = %decision.reason, category = ?decision.category, "filtered");
            } else {
                tracing::debug!(%url, reason = %decision.reason, category = ?decision.category, "filtered");
            }
        }

        self.stats.record(&decision);
        self.cache.insert(key, decision.clone());
        decision
    }

    /// Convenience for callers that only have a URL.
    pub fn is_allowed(&mut self, url: &str) -> bool {
        self.evaluate(url, "", "").allowed
    }

    fn decide(&self, url: &str, title: &str, description: &str) -> Result<FilterDecision, FilterError> {
        let config = self.rules.config();
        let compiled = self.rules.compiled();

        let domain = analyzer::extract_domain(url);
        if domain.is_empty() {
            return Err(FilterError::NoDomain(url.to_string()));
        }

        if analyzer::is_whitelisted(&domain, config) {
            return Ok(FilterDecision::allow(FilterReason::WhitelistedDomain));
        }

        if let Some(hit) = analyzer::is_blocked(&domain, compiled) {
            let reason = if hit.pattern {
                FilterReason::BlockedDomainPattern
            } else {
                FilterReason::BlockedDomain
            };
            return Ok(FilterDecision::block(reason)
                .with_category(hit.category)
                .with_details(hit.entry));
        }

        if let Some(hit) = analyzer::matches_keyword(url, title, description, compiled) {
            return Ok(FilterDecision::block(FilterReason::BlockedKeyword)
                .with_category(hit.category)
                .with_details(hit.keyword));
        }

        if let Some(tld) = config
            .suspicious_tlds
            .iter()
            .find(|tld| crate::rules::domain_matches_suffix(&domain, tld))
        {
            return Ok(FilterDecision::block(FilterReason::SuspiciousTld).with_details(tld.clone()));
        }

        if let Some(ext) = path_extension(url) {
            if config.blocked_file_extensions.contains(&ext) {
                return Ok(FilterDecision::block(FilterReason::BlockedFileExtension).with_details(ext));
            }
        }

        let reputation = analyzer::reputation_score(&domain);
        let details = || {
            reputation
                .flags
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(",")
        };
        match reputation.risk_level {
            RiskLevel::High => Ok(FilterDecision::block(FilterReason::SuspiciousDomainReputation)
                .with_details(details())),
            RiskLevel::Medium if config.settings.strict_mode => {
                Ok(FilterDecision::block(FilterReason::SuspiciousDomainReputation)
                    .with_details(details()))
            }
            _ => Ok(FilterDecision::allow(FilterReason::PassedAllChecks)),
        }
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(RuleStore::builtin())
    }
}
