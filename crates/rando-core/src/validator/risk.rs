//! Risk assessment that decides whether the user must confirm navigation.

use serde::Serialize;
use url::Url;

use crate::analyzer::{extract_domain, reputation_score, RiskLevel};
use crate::rules::RuleConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    /// True for medium and high risk.
    pub requires_confirmation: bool,
    pub risk_factors: Vec<String>,
}

/// Reputation flags, a configured suspicious TLD, and a port other than
/// 80/443 each count as one factor.
pub fn assess_website_risk(url: &str, rules: &RuleConfig) -> RiskAssessment {
    let domain = extract_domain(url);
    let mut risk_factors: Vec<String> = reputation_score(&domain)
        .flags
        .iter()
        .map(|f| f.as_str().to_string())
        .collect();

    if rules
        .suspicious_tlds
        .iter()
        .any(|tld| crate::rules::domain_matches_suffix(&domain, tld))
    {
        risk_factors.push("suspicious_tld".to_string());
    }

    let port = Url::parse(url).ok().and_then(|u| u.port());
    if port.is_some_and(|p| p != 80 && p != 443) {
        risk_factors.push("non_standard_port".to_string());
    }

    let risk_level = RiskLevel::from_flag_count(risk_factors.len());
    RiskAssessment {
        risk_level,
        requires_confirmation: risk_level >= RiskLevel::Medium,
        risk_factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_site_is_low() {
        let r = assess_website_risk("https://github.com", &RuleConfig::builtin());
        assert_eq!(r.risk_level, RiskLevel::Low);
        assert!(!r.requires_confirmation);
    }

    #[test]
    fn default_ports_do_not_count() {
        let r = assess_website_risk("https://github.com:443/", &RuleConfig::builtin());
        assert!(r.risk_factors.is_empty());
        let r = assess_website_risk("http://github.com:80/", &RuleConfig::builtin());
        assert!(r.risk_factors.is_empty());
    }

    #[test]
    fn port_and_pattern_need_confirmation() {
        let r = assess_website_risk("https://freegames.com:8443/", &RuleConfig::builtin());
        assert_eq!(r.risk_level, RiskLevel::Medium);
        assert!(r.requires_confirmation);
        assert!(r.risk_factors.contains(&"non_standard_port".to_string()));
    }

    #[test]
    fn suspicious_tld_counts() {
        let r = assess_website_risk("https://free-prize.tk:8080", &RuleConfig::builtin());
        assert_eq!(r.risk_level, RiskLevel::High);
        assert!(r.risk_factors.contains(&"suspicious_tld".to_string()));
    }
}
