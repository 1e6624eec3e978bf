//! Rule store: the loaded filter configuration and its compiled matchers.
//!
//! The JSON document (`RuleDocument`) is validated and normalised into a
//! `RuleConfig` (lowercased domains, TLDs and extensions without leading dots),
//! which is then compiled once into `CompiledRules`. Every mutation recompiles,
//! so matchers are never built on the hot path.

mod defaults;
mod load;
mod manage;
mod matcher;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub use load::{load_rules, parse_document, RuleSource, RULE_CACHE_TTL};
pub use manage::{is_valid_domain_format, normalize_domain_input, BulkItem};
pub use matcher::{domain_matches_suffix, BlockMatch, CompiledRules, DomainRule, KeywordMatch};

/// Global switches of the rule configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSettings {
    pub enabled: bool,
    pub case_sensitive: bool,
    /// Also block domains whose reputation is only "medium".
    pub strict_mode: bool,
    /// Log every blocked decision at info level.
    pub log_filtered_content: bool,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            case_sensitive: false,
            strict_mode: false,
            log_filtered_content: false,
        }
    }
}

/// Wire shape of the rule configuration JSON. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleDocument {
    pub version: Option<serde_json::Value>,
    pub settings: RuleSettings,
    pub blocked_keywords: BTreeMap<String, Vec<String>>,
    pub blocked_domains: BTreeMap<String, Vec<String>>,
    pub whitelisted_domains: Vec<String>,
    pub suspicious_tlds: Vec<String>,
    pub blocked_file_extensions: Vec<String>,
}

/// Normalised rule configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleConfig {
    pub version: Option<String>,
    pub settings: RuleSettings,
    /// Trimmed, in their original case; case folding happens at match time.
    pub blocked_keywords: BTreeMap<String, BTreeSet<String>>,
    /// Entries may contain `*` wildcards.
    pub blocked_domains: BTreeMap<String, BTreeSet<String>>,
    pub whitelisted_domains: BTreeSet<String>,
    /// Without the leading dot, lowercase.
    pub suspicious_tlds: BTreeSet<String>,
    /// Without the leading dot, lowercase.
    pub blocked_file_extensions: BTreeSet<String>,
}

fn strip_dot_lower(s: &str) -> Option<String> {
    let s = s.trim().trim_start_matches('.').to_lowercase();
    (!s.is_empty()).then_some(s)
}

fn clean_domain(s: &str) -> Option<String> {
    let s = s.trim().trim_end_matches('.').to_lowercase();
    (!s.is_empty()).then_some(s)
}

impl RuleConfig {
    /// Validate and default-fill a parsed document. Empty entries and empty
    /// categories are dropped; keywords are lowercased unless matching is
    /// case sensitive.
    pub fn from_document(doc: RuleDocument) -> Self {
        let version = doc.version.map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

        let blocked_keywords = doc
            .blocked_keywords
            .into_iter()
            .map(|(category, words)| {
                let set: BTreeSet<String> = words
                    .iter()
                    .map(|w| w.trim())
                    .filter(|w| !w.is_empty())
                    .map(str::to_string)
                    .collect();
                (category, set)
            })
            .filter(|(_, set)| !set.is_empty())
            .collect();

        let blocked_domains = doc
            .blocked_domains
            .into_iter()
            .map(|(category, domains)| {
                let set: BTreeSet<String> =
                    domains.iter().filter_map(|d| clean_domain(d)).collect();
                (category, set)
            })
            .filter(|(_, set)| !set.is_empty())
            .collect();

        Self {
            version,
            settings: doc.settings,
            blocked_keywords,
            blocked_domains,
            whitelisted_domains: doc
                .whitelisted_domains
                .iter()
                .filter_map(|d| clean_domain(d))
                .collect(),
            suspicious_tlds: doc
                .suspicious_tlds
                .iter()
                .filter_map(|t| strip_dot_lower(t))
                .collect(),
            blocked_file_extensions: doc
                .blocked_file_extensions
                .iter()
                .filter_map(|e| strip_dot_lower(e))
                .collect(),
        }
    }

    /// Minimal built-in rules used when no external config is available.
    pub fn builtin() -> Self {
        Self::from_document(defaults::builtin_document())
    }
}

/// Owner of the active rule configuration and its compiled form.
#[derive(Debug, Clone)]
pub struct RuleStore {
    config: RuleConfig,
    compiled: CompiledRules,
}

impl RuleStore {
    pub fn new(config: RuleConfig) -> Self {
        let compiled = CompiledRules::compile(&config);
        Self { config, compiled }
    }

    pub fn builtin() -> Self {
        Self::new(RuleConfig::builtin())
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn compiled(&self) -> &CompiledRules {
        &self.compiled
    }

    pub fn settings(&self) -> RuleSettings {
        self.config.settings
    }

    pub fn set_settings(&mut self, settings: RuleSettings) {
        let recompile = settings.case_sensitive != self.config.settings.case_sensitive;
        self.config.settings = settings;
        if recompile {
            self.recompile();
        }
    }

    pub(crate) fn recompile(&mut self) {
        self.compiled = CompiledRules::compile(&self.config);
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::builtin()
    }
}
