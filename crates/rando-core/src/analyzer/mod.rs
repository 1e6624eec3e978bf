//! Domain and URL analysis.
//!
//! Everything here is a pure function of its inputs: domain extraction,
//! whitelist / blacklist / keyword lookups against compiled rules, and the
//! string heuristics behind the reputation score.

mod patterns;
mod reputation;

use regex::Regex;
use std::sync::LazyLock;

use crate::rules::{BlockMatch, CompiledRules, KeywordMatch, RuleConfig};

pub use patterns::{has_homograph, has_suspicious_pattern, is_url_shortener, tld_reputation_risk};
pub use reputation::{reputation_score, DomainReputation, ReputationFlag, RiskLevel};

static AUTHORITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^@/?#]*@)?([^/:?#\s]+)").expect("authority regex is valid")
});

/// Lowercase host of `url`. Uses URL parsing first and falls back to
/// scraping the authority segment; empty if neither finds a host.
pub fn extract_domain(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            return host.trim_end_matches('.').to_lowercase();
        }
    }
    let trimmed = url.trim();
    let rest = match trimmed.find("://") {
        Some(idx) => &trimmed[idx + 3..],
        None => trimmed,
    };
    AUTHORITY
        .captures(rest)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_lowercase())
        .unwrap_or_default()
}

/// Exact match or subdomain of a whitelisted entry.
pub fn is_whitelisted(domain: &str, config: &RuleConfig) -> bool {
    config
        .whitelisted_domains
        .iter()
        .any(|entry| crate::rules::domain_matches_suffix(domain, entry))
}

/// First blocked-domain match (category, entry, whether it was a pattern).
pub fn is_blocked(domain: &str, rules: &CompiledRules) -> Option<BlockMatch> {
    rules.find_blocked_domain(domain)
}

/// Whole-word keyword match over url, title and description together.
pub fn matches_keyword(
    url: &str,
    title: &str,
    description: &str,
    rules: &CompiledRules,
) -> Option<KeywordMatch> {
    let text = format!("{url} {title} {description}");
    rules.find_keyword(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleConfig;

    #[test]
    fn extract_domain_parses_and_lowercases() {
        assert_eq!(extract_domain("https://WWW.Example.COM/path?q=1"), "www.example.com");
        assert_eq!(extract_domain("http://user:pw@host.org:8080/x"), "host.org");
    }

    #[test]
    fn extract_domain_falls_back_for_schemeless_input() {
        assert_eq!(extract_domain("Example.org/some/page"), "example.org");
        assert_eq!(extract_domain("sub.site.net:81"), "sub.site.net");
        assert_eq!(extract_domain(""), "");
    }

    #[test]
    fn whitelist_matches_subdomains() {
        let cfg = RuleConfig::builtin();
        assert!(is_whitelisted("wikipedia.org", &cfg));
        assert!(is_whitelisted("en.wikipedia.org", &cfg));
        assert!(!is_whitelisted("notwikipedia.org", &cfg));
    }

    #[test]
    fn keyword_match_uses_title_and_description() {
        let store = crate::rules::RuleStore::builtin();
        let rules = store.compiled();
        assert!(matches_keyword("https://example.com", "", "", rules).is_none());
        let hit = matches_keyword("https://example.com", "Online Casino", "", rules).unwrap();
        assert_eq!(hit.keyword, "casino");
        assert!(matches_keyword("https://example.com", "", "a scam page", rules).is_some());
    }
}
