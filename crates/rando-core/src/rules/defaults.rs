//! Built-in rule document used when no external configuration can be loaded.

use std::collections::BTreeMap;

use super::{RuleDocument, RuleSettings};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(super) fn builtin_document() -> RuleDocument {
    let mut blocked_keywords = BTreeMap::new();
    blocked_keywords.insert(
        "general".to_string(),
        strings(&[
            "adult", "porn", "xxx", "sex", "casino", "gambling", "drugs", "violence", "hate",
            "illegal", "scam",
        ]),
    );

    let mut blocked_domains = BTreeMap::new();
    blocked_domains.insert(
        "adult".to_string(),
        strings(&["pornhub.com", "xvideos.com", "redtube.com"]),
    );
    blocked_domains.insert(
        "gambling".to_string(),
        strings(&["casino.com", "gambling.com", "bet365.com"]),
    );

    RuleDocument {
        version: Some(serde_json::Value::String("builtin".to_string())),
        settings: RuleSettings::default(),
        blocked_keywords,
        blocked_domains,
        whitelisted_domains: strings(&["wikipedia.org"]),
        suspicious_tlds: strings(&["tk", "ml", "ga", "cf", "gq"]),
        blocked_file_extensions: strings(&["exe", "scr", "bat", "cmd", "msi", "apk"]),
    }
}
