//! The click-to-navigate cycle.
//!
//! `Idle → RateLimitCheck → Selecting → Validating → Navigating → Idle`.
//! Any refusal returns straight to idle with a message sent through
//! `Interaction::notify`; nothing here is fatal to the session.

mod session;

pub use session::{ClickPhase, Session};

use std::time::{Instant, SystemTime};

use crate::counter::{ClickCounter, CountReading, CounterApi};
use crate::error::{RateLimitExceeded, ReportError};
use crate::interaction::Interaction;
use crate::report::{submit_report, ContentReport};
use crate::selector::Selector;
use crate::store::StateStore;
use crate::validator::{Validator, VerdictReason};
use session::LoadingGuard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Navigated {
        url: String,
        count: CountReading,
        /// The selector gave up and returned the safe fallback URL.
        fallback: bool,
    },
    RateLimited(RateLimitExceeded),
    /// Another click is still in flight.
    Busy,
    Rejected {
        url: String,
        reason: VerdictReason,
    },
    /// Validation passed but the URL could not be handed to the browser.
    OpenFailed {
        url: String,
        error: String,
    },
}

pub struct Controller<A, I> {
    session: Session,
    selector: Selector,
    validator: Validator,
    counter: ClickCounter<A>,
    store: StateStore,
    ui: I,
}

impl<A: CounterApi, I: Interaction> Controller<A, I> {
    pub fn new(
        session: Session,
        selector: Selector,
        validator: Validator,
        counter: ClickCounter<A>,
        store: StateStore,
        ui: I,
    ) -> Self {
        Self {
            session,
            selector,
            validator,
            counter,
            store,
            ui,
        }
    }

    /// Connect the click counter. Returns false if it runs on the fallback.
    pub async fn start(&mut self) -> bool {
        let remote = self.counter.initialize(&mut self.store).await;
        self.persist();
        remote
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn counter(&self) -> &ClickCounter<A> {
        &self.counter
    }

    pub fn ui(&self) -> &I {
        &self.ui
    }

    pub async fn click(&mut self, now: Instant) -> ClickOutcome {
        let Some(_guard) = LoadingGuard::acquire(self.session.loading_flag()) else {
            tracing::debug!("click ignored, previous click still running");
            return ClickOutcome::Busy;
        };
        let outcome = self.run_click(now).await;
        self.session.enter(ClickPhase::Idle);
        self.persist();
        outcome
    }

    async fn run_click(&mut self, now: Instant) -> ClickOutcome {
        self.session.enter(ClickPhase::RateLimitCheck);
        if let Err(e) = self.session.rate_limiter.check(now) {
            self.ui.notify(&e.to_string());
            return ClickOutcome::RateLimited(e);
        }
        self.session.rate_limiter.record(now);

        self.session.enter(ClickPhase::Selecting);
        let selection = self
            .selector
            .generate_random_website(&self.session.history, &mut self.session.engine)
            .await;

        self.session.enter(ClickPhase::Validating);
        let verdict = self
            .validator
            .validate_before_opening(&selection.url, &mut self.session.engine, &self.ui, &mut self.store)
            .await;
        if !verdict.safe {
            tracing::info!(url = %selection.url, reason = %verdict.reason, "navigation refused");
            self.ui.notify(&format!("Not opening {}: {}", selection.url, verdict.reason));
            return ClickOutcome::Rejected {
                url: selection.url,
                reason: verdict.reason,
            };
        }

        self.session.enter(ClickPhase::Navigating);
        self.session.history.record(&selection.url, SystemTime::now());
        if let Err(e) = self.ui.open(&selection.url) {
            tracing::warn!(url = %selection.url, error = %e, "failed to open URL");
            self.ui.notify(&format!("Could not open {}: {e}", selection.url));
            return ClickOutcome::OpenFailed {
                url: selection.url,
                error: e.to_string(),
            };
        }
        let count = self.counter.increment(&mut self.store).await;
        tracing::info!(url = %selection.url, count = count.value, "opened random website");
        ClickOutcome::Navigated {
            url: selection.url,
            count,
            fallback: selection.fallback,
        }
    }

    /// Ask the user for a report on `url` and store it.
    pub async fn report(&mut self, url: &str) -> Result<ContentReport, ReportError> {
        let input = self.ui.collect_report(url).await.ok_or(ReportError::Cancelled)?;
        let report = submit_report(input, &mut self.store, SystemTime::now())?;
        self.persist();
        Ok(report)
    }

    fn persist(&self) {
        if let Err(e) = self.store.save() {
            tracing::warn!(error = %e, "failed to save state");
        }
    }
}
