//! Runtime blacklist management: add / remove blocked domains per category.

use std::collections::BTreeSet;

use crate::error::DomainError;

use super::RuleStore;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Lowercase, trim, and strip scheme, credentials, path, query, port and trailing dot.
pub fn normalize_domain_input(input: &str) -> String {
    let mut s = input.trim().to_lowercase();
    if let Some(idx) = s.find("://") {
        s = s[idx + 3..].to_string();
    }
    if let Some(idx) = s.find(['/', '?', '#']) {
        s.truncate(idx);
    }
    if let Some(idx) = s.rfind('@') {
        s = s[idx + 1..].to_string();
    }
    if let Some(idx) = s.find(':') {
        s.truncate(idx);
    }
    s.trim_end_matches('.').to_string()
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// RFC-like hostname check: at least two labels of 1..=63 alphanumerics or
/// hyphens (no leading/trailing hyphen), non-numeric TLD, at most 253 chars.
pub fn is_valid_domain_format(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|l| is_valid_label(l)) {
        return false;
    }
    labels
        .last()
        .is_some_and(|tld| !tld.bytes().all(|b| b.is_ascii_digit()))
}

/// Like `is_valid_domain_format` but also accepts a leading `*.` wildcard.
fn is_valid_blocklist_entry(domain: &str) -> bool {
    match domain.strip_prefix("*.") {
        Some(rest) => is_valid_domain_format(rest),
        None => is_valid_domain_format(domain),
    }
}

/// Outcome of one item in a bulk add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItem {
    pub input: String,
    /// `Ok(true)` if added, `Ok(false)` if it was already present.
    pub outcome: Result<bool, DomainError>,
}

fn checked(domain: &str, category: &str) -> Result<(String, String), DomainError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(DomainError::EmptyCategory);
    }
    let normalized = normalize_domain_input(domain);
    if !is_valid_blocklist_entry(&normalized) {
        return Err(DomainError::InvalidFormat(domain.to_string()));
    }
    Ok((normalized, category.to_string()))
}

impl RuleStore {
    /// Add a domain to a category, creating the category if needed.
    /// Returns whether the rules changed.
    pub fn add_blocked_domain(&mut self, domain: &str, category: &str) -> Result<bool, DomainError> {
        let (domain, category) = checked(domain, category)?;
        let inserted = self
            .config
            .blocked_domains
            .entry(category.clone())
            .or_insert_with(BTreeSet::new)
            .insert(domain.clone());
        if inserted {
            tracing::info!(%domain, %category, "added blocked domain");
            self.recompile();
        }
        Ok(inserted)
    }

    /// Remove a domain from a category. Empty categories are dropped.
    /// Returns whether the rules changed.
    pub fn remove_blocked_domain(
        &mut self,
        domain: &str,
        category: &str,
    ) -> Result<bool, DomainError> {
        let (domain, category) = checked(domain, category)?;
        let Some(set) = self.config.blocked_domains.get_mut(&category) else {
            return Ok(false);
        };
        let removed = set.remove(&domain);
        if set.is_empty() {
            self.config.blocked_domains.remove(&category);
        }
        if removed {
            tracing::info!(%domain, %category, "removed blocked domain");
            self.recompile();
        }
        Ok(removed)
    }

    /// Add many domains; invalid items are reported without aborting the batch.
    pub fn bulk_add_blocked_domains<S: AsRef<str>>(
        &mut self,
        domains: &[S],
        category: &str,
    ) -> Vec<BulkItem> {
        domains
            .iter()
            .map(|d| BulkItem {
                input: d.as_ref().to_string(),
                outcome: self.add_blocked_domain(d.as_ref(), category),
            })
            .collect()
    }
}
