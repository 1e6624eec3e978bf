//! Real-time safety checks run just before navigation.

use serde::Serialize;
use url::Url;

use crate::analyzer::{self, extract_domain};

/// Domains recently reported by users; refused outright.
const RECENTLY_REPORTED: &[&str] = &[
    "malware-test.com",
    "phishing-example.net",
    "scam-alert.org",
    "fake-bank-login.com",
    "free-prizes-now.net",
];

/// Query parameters commonly used for open redirects.
const REDIRECT_PARAMS: &[&str] = &[
    "url",
    "redirect",
    "redirect_uri",
    "redirect_url",
    "redir",
    "next",
    "goto",
    "return",
    "returnurl",
    "return_to",
    "dest",
    "destination",
    "continue",
    "out",
    "target",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyFlag {
    RedirectParameter,
    SuspiciousPattern,
    SuspiciousTldCombo,
    Homograph,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyReport {
    pub passed: bool,
    pub reason: Option<String>,
    pub flags: Vec<SafetyFlag>,
}

fn has_redirect_param(url: &str) -> bool {
    Url::parse(url)
        .map(|u| {
            u.query_pairs()
                .any(|(k, _)| REDIRECT_PARAMS.contains(&k.to_ascii_lowercase().as_str()))
        })
        .unwrap_or(false)
}

/// Shorteners and recently reported domains fail immediately; otherwise the
/// check fails only when two or more independent risk flags are set.
pub fn perform_real_time_safety_checks(url: &str) -> SafetyReport {
    let domain = extract_domain(url);

    if analyzer::is_url_shortener(&domain) {
        return SafetyReport {
            passed: false,
            reason: Some("url shorteners hide the real destination".to_string()),
            flags: Vec::new(),
        };
    }
    if RECENTLY_REPORTED
        .iter()
        .any(|d| crate::rules::domain_matches_suffix(&domain, d))
    {
        return SafetyReport {
            passed: false,
            reason: Some(format!("{domain} was recently reported as unsafe")),
            flags: Vec::new(),
        };
    }

    let checks = [
        (has_redirect_param(url), SafetyFlag::RedirectParameter),
        (analyzer::has_suspicious_pattern(&domain), SafetyFlag::SuspiciousPattern),
        (analyzer::tld_reputation_risk(&domain), SafetyFlag::SuspiciousTldCombo),
        (analyzer::has_homograph(&domain), SafetyFlag::Homograph),
    ];
    let flags: Vec<SafetyFlag> = checks
        .into_iter()
        .filter_map(|(hit, flag)| hit.then_some(flag))
        .collect();

    if flags.len() >= 2 {
        return SafetyReport {
            passed: false,
            reason: Some(format!("{} risk indicators present", flags.len())),
            flags,
        };
    }
    SafetyReport {
        passed: true,
        reason: None,
        flags,
    }
}
