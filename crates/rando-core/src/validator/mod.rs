//! Secondary safety gate run immediately before navigation.
//!
//! `Validator::validate_before_opening` chains: URL structure → filter engine
//! → real-time safety checks → risk assessment, asking the user to confirm
//! medium/high risk URLs with a bounded wait. Every outcome is appended to
//! the validation log in the state store.

mod risk;
mod safety;
mod structure;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime};

use crate::error::ValidationError;
use crate::filter::{FilterDecision, FilterEngine};
use crate::interaction::{ConfirmPrompt, Interaction};
use crate::store::{unix_secs, StateStore};

pub use risk::{assess_website_risk, RiskAssessment};
pub use safety::{perform_real_time_safety_checks, SafetyFlag, SafetyReport};
pub use structure::{is_http_url, is_private_host, validate_url_structure};

pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of the persisted validation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLogEntry {
    pub url: String,
    pub safe: bool,
    pub reason: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictReason {
    Passed,
    ConfirmedByUser,
    InvalidStructure(ValidationError),
    Filtered(FilterDecision),
    SafetyCheck(String),
    Declined,
    ConfirmationTimeout,
}

impl fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictReason::Passed => write!(f, "passed all checks"),
            VerdictReason::ConfirmedByUser => write!(f, "confirmed by user"),
            VerdictReason::InvalidStructure(e) => write!(f, "invalid URL: {e}"),
            VerdictReason::Filtered(d) => match &d.category {
                Some(c) => write!(f, "blocked by content filter ({}, {c})", d.reason),
                None => write!(f, "blocked by content filter ({})", d.reason),
            },
            VerdictReason::SafetyCheck(r) => write!(f, "failed safety check: {r}"),
            VerdictReason::Declined => write!(f, "declined by user"),
            VerdictReason::ConfirmationTimeout => write!(f, "no confirmation received"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub safe: bool,
    pub reason: VerdictReason,
    pub risk: Option<RiskAssessment>,
}

impl Verdict {
    fn unsafe_because(reason: VerdictReason) -> Self {
        Self {
            safe: false,
            reason,
            risk: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    confirm_timeout: Duration,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_TIMEOUT)
    }
}

impl Validator {
    pub fn new(confirm_timeout: Duration) -> Self {
        Self { confirm_timeout }
    }

    pub fn confirm_timeout(&self) -> Duration {
        self.confirm_timeout
    }

    /// Run every check and, if needed, the confirmation dialog. The verdict
    /// is logged to `store` regardless of outcome.
    pub async fn validate_before_opening<I: Interaction + ?Sized>(
        &self,
        url: &str,
        engine: &mut FilterEngine,
        ui: &I,
        store: &mut StateStore,
    ) -> Verdict {
        let verdict = self.run_checks(url, engine, ui).await;
        tracing::debug!(%url, safe = verdict.safe, reason = %verdict.reason, "validated");
        store.push_validation(ValidationLogEntry {
            url: url.to_string(),
            safe: verdict.safe,
            reason: verdict.reason.to_string(),
            timestamp: unix_secs(SystemTime::now()),
        });
        verdict
    }

    async fn run_checks<I: Interaction + ?Sized>(
        &self,
        url: &str,
        engine: &mut FilterEngine,
        ui: &I,
    ) -> Verdict {
        if let Err(e) = validate_url_structure(url) {
            return Verdict::unsafe_because(VerdictReason::InvalidStructure(e));
        }

        let decision = engine.evaluate(url, "", "");
        if !decision.allowed {
            return Verdict::unsafe_because(VerdictReason::Filtered(decision));
        }

        let safety = perform_real_time_safety_checks(url);
        if !safety.passed {
            let reason = safety.reason.unwrap_or_else(|| "unsafe".to_string());
            return Verdict::unsafe_because(VerdictReason::SafetyCheck(reason));
        }

        let risk = assess_website_risk(url, engine.rules().config());
        if !risk.requires_confirmation {
            return Verdict {
                safe: true,
                reason: VerdictReason::Passed,
                risk: Some(risk),
            };
        }

        let prompt = ConfirmPrompt {
            url: url.to_string(),
            risk: risk.clone(),
        };
        let reason = match tokio::time::timeout(self.confirm_timeout, ui.confirm(&prompt)).await {
            Ok(true) => VerdictReason::ConfirmedByUser,
            Ok(false) => VerdictReason::Declined,
            Err(_) => {
                tracing::info!(%url, "risk confirmation timed out");
                VerdictReason::ConfirmationTimeout
            }
        };
        Verdict {
            safe: reason == VerdictReason::ConfirmedByUser,
            reason,
            risk: Some(risk),
        }
    }
}
