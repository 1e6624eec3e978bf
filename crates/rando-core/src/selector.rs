//! Random website selection with repeat avoidance.
//!
//! Candidates come from the catalog: categories not seen in the last few
//! visits are preferred, and URLs seen in the last ten visits are skipped.
//! The filter engine gets the final say; if nothing passes, a fixed safe URL
//! is returned so selection never fails outright.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::filter::FilterEngine;
use crate::history::VisitHistory;
use crate::http::{self, Method};
use crate::validator::is_http_url;

/// URLs from this many recent visits are avoided.
pub const RECENT_URL_WINDOW: usize = 10;
/// Categories from this many recent visits are avoided when possible.
pub const RECENT_CATEGORY_WINDOW: usize = 5;
pub const MAX_PICK_ATTEMPTS: usize = 25;
/// Attempts during which the choice is restricted to fresh categories.
pub const FRESH_CATEGORY_ATTEMPTS: usize = 15;
pub const MAX_GENERATE_ATTEMPTS: usize = 10;
pub const DEFAULT_SAFE_URL: &str = "https://www.wikipedia.org";

/// An optional external provider of random websites, consulted before the catalog.
#[async_trait]
pub trait WebsiteSource: Send {
    async fn fetch(&mut self) -> Option<String>;
}

/// Asks an HTTP endpoint for a random website: the first non-empty line of a
/// successful `GET` response. Failures are logged and yield `None`.
#[derive(Debug, Clone)]
pub struct HttpWebsiteSource {
    url: String,
    timeout: Duration,
}

impl HttpWebsiteSource {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

fn first_url_line(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl WebsiteSource for HttpWebsiteSource {
    async fn fetch(&mut self) -> Option<String> {
        let url = self.url.clone();
        let timeout = self.timeout;
        let res = tokio::task::spawn_blocking(move || http::send(Method::Get, &url, timeout)).await;
        match res {
            Ok(Ok(resp)) if resp.is_success() => first_url_line(&resp.body),
            Ok(Ok(resp)) => {
                tracing::debug!(url = %self.url, status = resp.status, "website source answered with an error");
                None
            }
            Ok(Err(e)) => {
                tracing::debug!(url = %self.url, "website source unreachable: {e}");
                None
            }
            Err(e) => {
                tracing::warn!("website source task failed: {e}");
                None
            }
        }
    }
}

/// The outcome of `generate_random_website`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub url: String,
    pub attempts: usize,
    /// True if every attempt failed and the safe URL was returned.
    pub fallback: bool,
}

pub struct Selector {
    catalog: Catalog,
    rng: StdRng,
    external: Option<Box<dyn WebsiteSource>>,
    safe_url: String,
}

impl Selector {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_rng(catalog, StdRng::from_os_rng())
    }

    /// Deterministic selector for tests and reproducible runs.
    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Catalog, rng: StdRng) -> Self {
        Self {
            catalog,
            rng,
            external: None,
            safe_url: DEFAULT_SAFE_URL.to_string(),
        }
    }

    pub fn with_external_source(mut self, source: Box<dyn WebsiteSource>) -> Self {
        self.external = Some(source);
        self
    }

    pub fn with_safe_url(mut self, url: impl Into<String>) -> Self {
        self.safe_url = url.into();
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Pick a catalog URL, avoiding recent URLs and preferring fresh categories.
    pub fn pick_candidate(&mut self, history: &VisitHistory) -> String {
        let recent_urls: HashSet<&str> = history
            .recent(RECENT_URL_WINDOW)
            .map(|r| r.url.as_str())
            .collect();
        let recent_categories: HashSet<&str> = history
            .recent(RECENT_CATEGORY_WINDOW)
            .filter_map(|r| self.catalog.category_of(&r.url))
            .collect();
        let all: Vec<&str> = self.catalog.category_names().collect();
        let fresh: Vec<&str> = all
            .iter()
            .copied()
            .filter(|c| !recent_categories.contains(c))
            .collect();

        for attempt in 1..=MAX_PICK_ATTEMPTS {
            let pool = if attempt <= FRESH_CATEGORY_ATTEMPTS && !fresh.is_empty() {
                &fresh
            } else {
                &all
            };
            let category = pool[self.rng.random_range(0..pool.len())];
            let entries = self.catalog.entries(category);
            let url = &entries[self.rng.random_range(0..entries.len())];
            if !recent_urls.contains(url.as_str()) {
                tracing::trace!(%url, %category, attempt, "picked candidate");
                return url.clone();
            }
        }

        tracing::debug!("all pick attempts hit recent URLs, allowing a repeat");
        let category = all[self.rng.random_range(0..all.len())];
        let entries = self.catalog.entries(category);
        entries[self.rng.random_range(0..entries.len())].clone()
    }

    /// Produce a URL that is well-formed http(s) and allowed by the filter.
    pub async fn generate_random_website(
        &mut self,
        history: &VisitHistory,
        engine: &mut FilterEngine,
    ) -> Selection {
        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            let external = match (&mut self.external, attempt) {
                (Some(source), 1) => source.fetch().await,
                _ => None,
            };
            let candidate = match external {
                Some(url) => url,
                None => self.pick_candidate(history),
            };

            if !is_http_url(&candidate) {
                tracing::debug!(url = %candidate, attempt, "candidate is not an http(s) URL");
                continue;
            }
            let decision = engine.evaluate(&candidate, "", "");
            if decision.allowed {
                return Selection {
                    url: candidate,
                    attempts: attempt,
                    fallback: false,
                };
            }
            tracing::debug!(url = %candidate, reason = %decision.reason, attempt, "candidate rejected");
        }

        tracing::warn!(url = %self.safe_url, "no candidate passed the filter, using safe fallback");
        Selection {
            url: self.safe_url.clone(),
            attempts: MAX_GENERATE_ATTEMPTS,
            fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleConfig, RuleDocument, RuleStore};
    use std::collections::BTreeMap;
    use std::time::SystemTime;

    fn grid_catalog(categories: usize, per_category: usize) -> Catalog {
        let mut map = BTreeMap::new();
        for c in 0..categories {
            map.insert(
                format!("cat{c}"),
                (0..per_category)
                    .map(|i| format!("https://c{c}-site{i}.example.org"))
                    .collect(),
            );
        }
        Catalog::new(map).unwrap()
    }

    fn engine_blocking(domain: &str, category: &str) -> FilterEngine {
        let doc: RuleDocument = serde_json::from_str(&format!(
            r#"{{"blockedDomains": {{"{category}": ["{domain}"]}}}}"#
        ))
        .unwrap();
        FilterEngine::new(RuleStore::new(RuleConfig::from_document(doc)))
    }

    #[test]
    fn repeat_rate_is_low_with_memory() {
        let mut selector = Selector::with_seed(grid_catalog(5, 10), 42);
        let mut history = VisitHistory::new();
        let now = SystemTime::now();
        for _ in 0..15 {
            let url = selector.pick_candidate(&history);
            history.record(&url, now);
        }
        let repeats = history.repeat_count();
        assert!(repeats * 2 < 15, "repeat count {repeats} too high");
    }

    #[test]
    fn last_ten_urls_are_never_repeated_when_avoidable() {
        let mut selector = Selector::with_seed(grid_catalog(5, 10), 7);
        let mut history = VisitHistory::new();
        let now = SystemTime::now();
        for _ in 0..40 {
            let url = selector.pick_candidate(&history);
            let recent: Vec<&str> = history.recent(RECENT_URL_WINDOW).map(|r| r.url.as_str()).collect();
            assert!(!recent.contains(&url.as_str()), "{url} repeated within window");
            history.record(&url, now);
        }
    }

    #[test]
    fn prefers_fresh_category() {
        let catalog = grid_catalog(5, 10);
        let mut history = VisitHistory::new();
        let now = SystemTime::now();
        for c in [0, 1, 2, 3, 0] {
            history.record(&format!("https://c{c}-site0.example.org"), now);
        }
        for seed in 0..20 {
            let mut selector = Selector::with_seed(catalog.clone(), seed);
            let url = selector.pick_candidate(&history);
            assert_eq!(catalog.category_of(&url), Some("cat4"), "seed {seed}");
        }
    }

    #[test]
    fn exhausted_attempts_allow_repeat() {
        let catalog = Catalog::from_json(r#"{"only": ["https://one.example.org"]}"#).unwrap();
        let mut selector = Selector::with_seed(catalog, 1);
        let mut history = VisitHistory::new();
        history.record("https://one.example.org", SystemTime::now());
        assert_eq!(selector.pick_candidate(&history), "https://one.example.org");
    }

    #[tokio::test]
    async fn blocked_catalog_entries_are_never_selected() {
        let catalog = Catalog::from_json(
            r#"{"edu": ["https://wikipedia.org"], "bad": ["https://casino.com"]}"#,
        )
        .unwrap();
        let mut selector = Selector::with_seed(catalog, 3);
        let mut engine = engine_blocking("casino.com", "gambling");
        let mut history = VisitHistory::new();
        for _ in 0..30 {
            let selection = selector.generate_random_website(&history, &mut engine).await;
            assert!(!selection.url.contains("casino.com"));
            history.record(&selection.url, SystemTime::now());
        }
        assert!(engine.stats().blocked_by_category.contains_key("gambling"));
    }

    #[tokio::test]
    async fn falls_back_to_safe_url_when_everything_is_blocked() {
        let catalog = Catalog::from_json(r#"{"bad": ["https://casino.com"]}"#).unwrap();
        let mut selector = Selector::with_seed(catalog, 9).with_safe_url("https://safe.example.org");
        let mut engine = engine_blocking("casino.com", "gambling");
        let selection = selector
            .generate_random_website(&VisitHistory::new(), &mut engine)
            .await;
        assert!(selection.fallback);
        assert_eq!(selection.url, "https://safe.example.org");
        assert_eq!(selection.attempts, MAX_GENERATE_ATTEMPTS);
    }

    struct FixedSource(Option<String>);

    #[async_trait]
    impl WebsiteSource for FixedSource {
        async fn fetch(&mut self) -> Option<String> {
            self.0.take()
        }
    }

    #[tokio::test]
    async fn external_source_is_tried_first() {
        let mut selector = Selector::with_seed(grid_catalog(2, 2), 5)
            .with_external_source(Box::new(FixedSource(Some("https://external.example.net".into()))));
        let mut engine = FilterEngine::default();
        let selection = selector
            .generate_random_website(&VisitHistory::new(), &mut engine)
            .await;
        assert_eq!(selection.url, "https://external.example.net");
        assert_eq!(selection.attempts, 1);
    }

    #[test]
    fn source_body_uses_first_non_empty_line() {
        assert_eq!(
            first_url_line("\n  https://a.example.org  \nhttps://b.example.org"),
            Some("https://a.example.org".to_string())
        );
        assert_eq!(first_url_line(" \n\n"), None);
    }

    #[tokio::test]
    async fn unreachable_http_source_falls_through_to_catalog() {
        let source = HttpWebsiteSource::new("http://127.0.0.1:9/random");
        let mut selector = Selector::with_seed(grid_catalog(2, 2), 5).with_external_source(Box::new(source));
        let mut engine = FilterEngine::default();
        let selection = selector
            .generate_random_website(&VisitHistory::new(), &mut engine)
            .await;
        assert!(selection.url.starts_with("https://c"));
        assert_eq!(selection.attempts, 1);
    }

    #[tokio::test]
    async fn malformed_external_url_falls_through_to_catalog() {
        let mut selector = Selector::with_seed(grid_catalog(2, 2), 5)
            .with_external_source(Box::new(FixedSource(Some("javascript:alert(1)".into()))));
        let mut engine = FilterEngine::default();
        let selection = selector
            .generate_random_website(&VisitHistory::new(), &mut engine)
            .await;
        assert!(selection.url.starts_with("https://c"));
        assert!(!selection.fallback);
        assert_eq!(selection.attempts, 2);
    }
}
