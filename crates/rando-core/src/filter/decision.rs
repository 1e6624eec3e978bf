//! Filter decision types.

use serde::{Deserialize, Serialize};

/// Why a URL was allowed or blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterReason {
    FilteringDisabled,
    WhitelistedDomain,
    BlockedDomain,
    BlockedDomainPattern,
    BlockedKeyword,
    SuspiciousTld,
    BlockedFileExtension,
    SuspiciousDomainReputation,
    PassedAllChecks,
    FilteringError,
}

impl FilterReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterReason::FilteringDisabled => "filtering_disabled",
            FilterReason::WhitelistedDomain => "whitelisted_domain",
            FilterReason::BlockedDomain => "blocked_domain",
            FilterReason::BlockedDomainPattern => "blocked_domain_pattern",
            FilterReason::BlockedKeyword => "blocked_keyword",
            FilterReason::SuspiciousTld => "suspicious_tld",
            FilterReason::BlockedFileExtension => "blocked_file_extension",
            FilterReason::SuspiciousDomainReputation => "suspicious_domain_reputation",
            FilterReason::PassedAllChecks => "passed_all_checks",
            FilterReason::FilteringError => "filtering_error",
        }
    }
}

impl std::fmt::Display for FilterReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allow / block verdict for one (url, title, description) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDecision {
    pub allowed: bool,
    pub reason: FilterReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl FilterDecision {
    pub fn allow(reason: FilterReason) -> Self {
        Self {
            allowed: true,
            reason,
            category: None,
            details: None,
        }
    }

    pub fn block(reason: FilterReason) -> Self {
        Self {
            allowed: false,
            reason,
            category: None,
            details: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
