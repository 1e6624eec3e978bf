use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Retry policy for counter calls (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Linear backoff step in milliseconds: attempt N waits N * step.
    pub step_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            step_delay_ms: 1000,
        }
    }
}

/// Client-side click throttling. Advisory only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum delay between two accepted clicks, in milliseconds.
    pub min_delay_ms: u64,
    /// Maximum accepted clicks in any rolling 60 second window.
    pub max_per_minute: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_per_minute: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/rando/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandoConfig {
    /// Rule configuration JSON: an http(s) URL or a file path. Missing means built-in rules.
    #[serde(default)]
    pub rules_source: Option<String>,
    /// Endpoint answering `GET` with a random website URL, asked before the catalog.
    #[serde(default)]
    pub website_source_url: Option<String>,
    /// Base URL of the click counter service.
    pub counter_api_url: String,
    /// Seconds to wait for a risk confirmation before treating it as declined.
    pub confirm_timeout_secs: u64,
    /// Maximum number of cached filter decisions.
    pub filter_cache_capacity: usize,
    /// Returned when every selection attempt fails.
    pub safe_fallback_url: String,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for RandoConfig {
    fn default() -> Self {
        Self {
            rules_source: None,
            website_source_url: None,
            counter_api_url: "https://tick.rs/c".to_string(),
            confirm_timeout_secs: 30,
            filter_cache_capacity: 1000,
            safe_fallback_url: "https://www.wikipedia.org".to_string(),
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl RandoConfig {
    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rando")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RandoConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RandoConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RandoConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = RandoConfig::default();
        assert!(cfg.rules_source.is_none());
        assert!(cfg.website_source_url.is_none());
        assert_eq!(cfg.counter_api_url, "https://tick.rs/c");
        assert_eq!(cfg.confirm_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.filter_cache_capacity, 1000);
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.rate_limit.max_per_minute, 30);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RandoConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RandoConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.counter_api_url, cfg.counter_api_url);
        assert_eq!(parsed.safe_fallback_url, cfg.safe_fallback_url);
        assert_eq!(parsed.rate_limit.min_delay_ms, cfg.rate_limit.min_delay_ms);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            rules_source = "/etc/rando/rules.json"
            website_source_url = "http://127.0.0.1:9000/random"
            counter_api_url = "http://127.0.0.1:9000/c"
            confirm_timeout_secs = 5
            filter_cache_capacity = 10
            safe_fallback_url = "https://example.org"

            [retry]
            max_attempts = 5
            step_delay_ms = 20

            [rate_limit]
            min_delay_ms = 0
            max_per_minute = 2
        "#;
        let cfg: RandoConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.rules_source.as_deref(), Some("/etc/rando/rules.json"));
        assert_eq!(cfg.website_source_url.as_deref(), Some("http://127.0.0.1:9000/random"));
        assert_eq!(cfg.confirm_timeout_secs, 5);
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.step_delay_ms, 20);
        assert_eq!(cfg.rate_limit.max_per_minute, 2);
    }

    #[test]
    fn config_toml_missing_sections_use_defaults() {
        let toml = r#"
            counter_api_url = "https://tick.rs/c"
            confirm_timeout_secs = 30
            filter_cache_capacity = 1000
            safe_fallback_url = "https://www.wikipedia.org"
        "#;
        let cfg: RandoConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.rate_limit.min_delay_ms, 1000);
    }
}
