//! Precompiled domain and keyword matchers.

use regex::Regex;

use super::RuleConfig;

/// One blocked-domain entry, compiled.
#[derive(Debug, Clone)]
pub enum DomainRule {
    /// Matches the domain itself and any subdomain of it.
    Exact(String),
    /// `*` wildcard entry; `*` matches any run of characters.
    Wildcard { pattern: String, regex: Regex },
}

impl DomainRule {
    /// Compile a normalised entry. Wildcard entries that fail to compile are
    /// returned as errors so they are never consulted.
    pub fn compile(entry: &str) -> Result<Self, regex::Error> {
        if !entry.contains('*') {
            return Ok(DomainRule::Exact(entry.to_string()));
        }
        let body = entry
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("^{body}$"))?;
        Ok(DomainRule::Wildcard {
            pattern: entry.to_string(),
            regex,
        })
    }

    pub fn entry(&self) -> &str {
        match self {
            DomainRule::Exact(d) => d,
            DomainRule::Wildcard { pattern, .. } => pattern,
        }
    }
}

/// Exact match or suffix match on `.` + entry.
pub fn domain_matches_suffix(domain: &str, entry: &str) -> bool {
    domain == entry
        || (domain.len() > entry.len()
            && domain.ends_with(entry)
            && domain.as_bytes()[domain.len() - entry.len() - 1] == b'.')
}

/// Result of a blocked-domain lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatch {
    pub category: String,
    pub entry: String,
    /// True if the entry was a wildcard pattern.
    pub pattern: bool,
}

/// Result of a keyword lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub category: String,
    pub keyword: String,
}

#[derive(Debug, Clone)]
struct DomainCategory {
    name: String,
    exact: Vec<String>,
    wildcards: Vec<DomainRule>,
}

#[derive(Debug, Clone)]
struct KeywordCategory {
    name: String,
    regex: Regex,
}

/// Matchers compiled from a `RuleConfig`. Rebuilt on every rule change.
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    domains: Vec<DomainCategory>,
    keywords: Vec<KeywordCategory>,
    case_sensitive: bool,
}

impl CompiledRules {
    pub fn compile(config: &RuleConfig) -> Self {
        let domains = config
            .blocked_domains
            .iter()
            .map(|(name, entries)| {
                let mut exact = Vec::new();
                let mut wildcards = Vec::new();
                for entry in entries {
                    match DomainRule::compile(entry) {
                        Ok(DomainRule::Exact(d)) => exact.push(d),
                        Ok(rule) => wildcards.push(rule),
                        Err(e) => {
                            tracing::warn!(category = %name, entry = %entry, "skipping invalid domain pattern: {e}");
                        }
                    }
                }
                DomainCategory {
                    name: name.clone(),
                    exact,
                    wildcards,
                }
            })
            .collect();

        let case_sensitive = config.settings.case_sensitive;
        let keywords = config
            .blocked_keywords
            .iter()
            .filter_map(|(name, words)| {
                let alternation = words
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join("|");
                let flags = if case_sensitive { "" } else { "(?i)" };
                match Regex::new(&format!(r"{flags}\b(?:{alternation})\b")) {
                    Ok(regex) => Some(KeywordCategory {
                        name: name.clone(),
                        regex,
                    }),
                    Err(e) => {
                        tracing::warn!(category = %name, "skipping keyword category: {e}");
                        None
                    }
                }
            })
            .collect();

        Self {
            domains,
            keywords,
            case_sensitive,
        }
    }

    /// First blocked-domain hit across categories. Within a category, plain
    /// entries (exact or parent domain) are checked before wildcard patterns.
    pub fn find_blocked_domain(&self, domain: &str) -> Option<BlockMatch> {
        for category in &self.domains {
            if let Some(entry) = category
                .exact
                .iter()
                .find(|entry| domain_matches_suffix(domain, entry))
            {
                return Some(BlockMatch {
                    category: category.name.clone(),
                    entry: entry.clone(),
                    pattern: false,
                });
            }
            for rule in &category.wildcards {
                if let DomainRule::Wildcard { regex, pattern } = rule {
                    if regex.is_match(domain) {
                        return Some(BlockMatch {
                            category: category.name.clone(),
                            entry: pattern.clone(),
                            pattern: true,
                        });
                    }
                }
            }
        }
        None
    }

    /// First whole-word keyword hit in `text`.
    pub fn find_keyword(&self, text: &str) -> Option<KeywordMatch> {
        self.keywords.iter().find_map(|category| {
            category.regex.find(text).map(|m| KeywordMatch {
                category: category.name.clone(),
                keyword: if self.case_sensitive {
                    m.as_str().to_string()
                } else {
                    m.as_str().to_lowercase()
                },
            })
        })
    }

    #[cfg(test)]
    pub(crate) fn wildcard_count(&self) -> usize {
        self.domains.iter().map(|c| c.wildcards.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleConfig, RuleDocument};

    fn compiled(json: &str) -> CompiledRules {
        let doc: RuleDocument = serde_json::from_str(json).unwrap();
        CompiledRules::compile(&RuleConfig::from_document(doc))
    }

    #[test]
    fn suffix_match_requires_label_boundary() {
        assert!(domain_matches_suffix("casino.com", "casino.com"));
        assert!(domain_matches_suffix("www.casino.com", "casino.com"));
        assert!(!domain_matches_suffix("notcasino.com", "casino.com"));
        assert!(!domain_matches_suffix("com", "casino.com"));
    }

    #[test]
    fn wildcard_escapes_dots() {
        let rule = DomainRule::compile("*.tk").unwrap();
        let DomainRule::Wildcard { regex, .. } = rule else {
            panic!("expected wildcard");
        };
        assert!(regex.is_match("free.tk"));
        assert!(regex.is_match("a.b.c.tk"));
        assert!(!regex.is_match("freetk"));
        assert!(!regex.is_match("free.tk.example.com"));
    }

    #[test]
    fn find_blocked_domain_prefers_plain_entries() {
        let rules = compiled(r#"{"blockedDomains": {"bad": ["*.example.com", "example.com"]}}"#);
        let hit = rules.find_blocked_domain("www.example.com").unwrap();
        assert_eq!(hit.category, "bad");
        assert!(!hit.pattern);
        assert_eq!(rules.wildcard_count(), 1);
    }

    #[test]
    fn find_keyword_whole_word_only() {
        let rules = compiled(r#"{"blockedKeywords": {"general": ["sex"]}}"#);
        assert!(rules.find_keyword("https://www.sussex.ac.uk").is_none());
        let hit = rules.find_keyword("Free SEX videos").unwrap();
        assert_eq!(hit.keyword, "sex");
        assert_eq!(hit.category, "general");
    }

    #[test]
    fn find_keyword_case_sensitive() {
        let rules = compiled(
            r#"{"settings": {"caseSensitive": true}, "blockedKeywords": {"g": ["Casino"]}}"#,
        );
        assert!(rules.find_keyword("best casino").is_none());
        assert!(rules.find_keyword("best Casino").is_some());
    }
}
