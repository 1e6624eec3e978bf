//! Everything a command needs: config, persisted state, catalog and rules.

use anyhow::Result;
use rando_core::catalog::Catalog;
use rando_core::config::{self, RandoConfig};
use rando_core::controller::{Controller, Session};
use rando_core::counter::{ClickCounter, CurlCounterApi};
use rando_core::filter::FilterEngine;
use rando_core::rate_limit::RateLimiter;
use rando_core::retry::RetryPolicy;
use rando_core::rules::{load_rules, RuleSource};
use rando_core::selector::{HttpWebsiteSource, Selector};
use rando_core::store::StateStore;
use rando_core::validator::Validator;
use std::path::Path;
use std::time::SystemTime;

use super::terminal::TerminalUi;

pub struct AppContext {
    pub cfg: RandoConfig,
    pub store: StateStore,
    pub catalog: Catalog,
    pub engine: FilterEngine,
}

impl AppContext {
    pub async fn load(catalog_path: Option<&Path>) -> Result<Self> {
        let cfg = config::load_or_init()?;
        let mut store = StateStore::open_default()?;
        let catalog = match catalog_path {
            Some(path) => Catalog::load_from_path(path)?,
            None => Catalog::builtin(),
        };
        let source = RuleSource::from_setting(cfg.rules_source.as_deref());
        let rules = load_rules(&source, &mut store, SystemTime::now()).await;
        let engine = FilterEngine::with_capacity(rules, cfg.filter_cache_capacity);
        Ok(Self {
            cfg,
            store,
            catalog,
            engine,
        })
    }

    pub fn validator(&self) -> Validator {
        Validator::new(self.cfg.confirm_timeout())
    }

    pub fn click_counter(&self) -> ClickCounter<CurlCounterApi> {
        ClickCounter::new(
            CurlCounterApi::new(self.cfg.counter_api_url.as_str()),
            RetryPolicy::from_config(&self.cfg.retry),
        )
    }

    pub fn save(&self) -> Result<()> {
        self.store.save()
    }

    /// Hand everything over to a click controller talking to the terminal.
    pub fn into_controller(self, launch_browser: bool) -> Controller<CurlCounterApi, TerminalUi> {
        let validator = self.validator();
        let counter = self.click_counter();
        let mut selector = Selector::new(self.catalog).with_safe_url(self.cfg.safe_fallback_url.as_str());
        if let Some(url) = self.cfg.website_source_url.as_deref() {
            selector = selector.with_external_source(Box::new(HttpWebsiteSource::new(url)));
        }
        let session = Session::new(self.engine, RateLimiter::from_config(&self.cfg.rate_limit));
        Controller::new(
            session,
            selector,
            validator,
            counter,
            self.store,
            TerminalUi::new(launch_browser),
        )
    }
}
