//! Heuristic reputation score: count of risk flags mapped to a level.

use serde::{Deserialize, Serialize};

use super::patterns::{has_homograph, has_suspicious_pattern, is_url_shortener, tld_reputation_risk};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// 3+ flags is high, 2 is medium, anything less is low.
    pub fn from_flag_count(count: usize) -> Self {
        match count {
            0 | 1 => RiskLevel::Low,
            2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationFlag {
    SuspiciousLength,
    SuspiciousPattern,
    Homograph,
    SuspiciousTldCombo,
    UrlShortener,
}

impl ReputationFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            ReputationFlag::SuspiciousLength => "suspicious_length",
            ReputationFlag::SuspiciousPattern => "suspicious_pattern",
            ReputationFlag::Homograph => "homograph",
            ReputationFlag::SuspiciousTldCombo => "suspicious_tld_combo",
            ReputationFlag::UrlShortener => "url_shortener",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainReputation {
    pub risk_level: RiskLevel,
    pub flags: Vec<ReputationFlag>,
}

pub fn reputation_score(domain: &str) -> DomainReputation {
    let len = domain.chars().count();
    let checks = [
        (len < 4 || len > 50, ReputationFlag::SuspiciousLength),
        (has_suspicious_pattern(domain), ReputationFlag::SuspiciousPattern),
        (has_homograph(domain), ReputationFlag::Homograph),
        (tld_reputation_risk(domain), ReputationFlag::SuspiciousTldCombo),
        (is_url_shortener(domain), ReputationFlag::UrlShortener),
    ];
    let flags: Vec<ReputationFlag> = checks
        .into_iter()
        .filter_map(|(hit, flag)| hit.then_some(flag))
        .collect();
    DomainReputation {
        risk_level: RiskLevel::from_flag_count(flags.len()),
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_domain_is_low() {
        let rep = reputation_score("github.com");
        assert_eq!(rep.risk_level, RiskLevel::Low);
        assert!(rep.flags.is_empty());
    }

    #[test]
    fn two_flags_is_medium() {
        let rep = reputation_score("free-prize.tk");
        assert_eq!(rep.risk_level, RiskLevel::Medium);
        assert!(rep.flags.contains(&ReputationFlag::SuspiciousPattern));
        assert!(rep.flags.contains(&ReputationFlag::SuspiciousTldCombo));
    }

    #[test]
    fn three_flags_is_high() {
        // Pattern (free, digits) + TLD combo + length.
        let domain = format!("free-prize-{}.tk", "9".repeat(45));
        let rep = reputation_score(&domain);
        assert_eq!(rep.risk_level, RiskLevel::High);
        assert!(rep.flags.len() >= 3);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(RiskLevel::from_flag_count(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_flag_count(1), RiskLevel::Low);
        assert_eq!(RiskLevel::from_flag_count(2), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_flag_count(5), RiskLevel::High);
    }
}
