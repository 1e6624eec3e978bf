//! Loading rule configuration from a file or URL, with built-in fallback.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::error::ConfigLoadError;
use crate::http::{self, Method};
use crate::store::{BlocklistAction, StateStore};

use super::{RuleConfig, RuleDocument, RuleStore};

/// Remote rule documents are reused for this long.
pub const RULE_CACHE_TTL: Duration = crate::store::BLOB_TTL;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Where rule configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    Builtin,
    File(PathBuf),
    Url(String),
}

impl RuleSource {
    /// Interpret the `rules_source` config value: http(s) URLs are fetched,
    /// anything else is a file path.
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting.map(str::trim) {
            None | Some("") => RuleSource::Builtin,
            Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
                RuleSource::Url(s.to_string())
            }
            Some(s) => RuleSource::File(PathBuf::from(s)),
        }
    }
}

fn blob_key(url: &str) -> String {
    format!("rules:{url}")
}

/// Parse and normalise a rule configuration JSON document.
pub fn parse_document(data: &str) -> Result<RuleConfig, ConfigLoadError> {
    let doc: RuleDocument = serde_json::from_str(data)?;
    Ok(RuleConfig::from_document(doc))
}

async fn fetch(url: &str) -> Result<String, ConfigLoadError> {
    let owned = url.to_string();
    let response = tokio::task::spawn_blocking(move || http::send(Method::Get, &owned, FETCH_TIMEOUT))
        .await
        .map_err(|e| ConfigLoadError::Join(e.to_string()))?
        .map_err(|source| ConfigLoadError::Fetch {
            url: url.to_string(),
            source,
        })?;
    if !response.is_success() {
        return Err(ConfigLoadError::Http {
            url: url.to_string(),
            status: response.status,
        });
    }
    Ok(response.body)
}

async fn load_config(
    source: &RuleSource,
    state: &mut StateStore,
    now: SystemTime,
) -> Result<RuleConfig, ConfigLoadError> {
    match source {
        RuleSource::Builtin => Ok(RuleConfig::builtin()),
        RuleSource::File(path) => {
            let data = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
                path: path.display().to_string(),
                source,
            })?;
            parse_document(&data)
        }
        RuleSource::Url(url) => {
            let key = blob_key(url);
            if let Some(cached) = state.cached_blob(&key, now, RULE_CACHE_TTL) {
                match parse_document(cached) {
                    Ok(cfg) => {
                        tracing::debug!(%url, "using cached rule config");
                        return Ok(cfg);
                    }
                    Err(e) => tracing::warn!(%url, "discarding cached rule config: {e}"),
                }
            }
            let data = fetch(url).await?;
            let cfg = parse_document(&data)?;
            let dropped = state.prune_expired_blobs(now, RULE_CACHE_TTL);
            if dropped > 0 {
                tracing::debug!(dropped, "dropped expired rule caches");
            }
            state.put_blob(&key, data, now);
            Ok(cfg)
        }
    }
}

/// Replay the user's blocklist edits: removals first, then additions.
fn apply_overrides(store: &mut RuleStore, state: &StateStore) {
    let overrides = state.blocklist_overrides();
    let ordered = overrides
        .iter()
        .filter(|o| o.action == BlocklistAction::Remove)
        .chain(overrides.iter().filter(|o| o.action == BlocklistAction::Add));
    for o in ordered {
        let res = match o.action {
            BlocklistAction::Remove => store.remove_blocked_domain(&o.domain, &o.category),
            BlocklistAction::Add => store.add_blocked_domain(&o.domain, &o.category),
        };
        if let Err(e) = res {
            tracing::warn!(domain = %o.domain, category = %o.category, "skipping stored blocklist edit: {e}");
        }
    }
}

/// Load rules from `source`, falling back to the built-in rules on any
/// error, then apply stored blocklist edits. Never fails.
pub async fn load_rules(source: &RuleSource, state: &mut StateStore, now: SystemTime) -> RuleStore {
    let config = match load_config(source, state, now).await {
        Ok(cfg) => {
            tracing::info!(version = ?cfg.version, "loaded rule config");
            cfg
        }
        Err(e) => {
            tracing::warn!("rule config unavailable, using built-in rules: {e}");
            RuleConfig::builtin()
        }
    };
    let mut store = RuleStore::new(config);
    apply_overrides(&mut store, state);
    store
}
