//! Capability interface to the user-facing layer.
//!
//! The validator and controller only talk to the user through this trait, so
//! a terminal, TUI or web front end can supply its own implementation.

use async_trait::async_trait;

use crate::report::ReportInput;
use crate::validator::RiskAssessment;

/// A request for the user to confirm navigating to a risky URL.
#[derive(Debug, Clone)]
pub struct ConfirmPrompt {
    pub url: String,
    pub risk: RiskAssessment,
}

impl ConfirmPrompt {
    pub fn message(&self) -> String {
        format!(
            "{} looks {} risk ({}). Continue?",
            self.url,
            self.risk.risk_level.as_str(),
            self.risk.risk_factors.join(", ")
        )
    }
}

#[async_trait]
pub trait Interaction: Send + Sync {
    /// Ask for a yes/no answer. Callers bound the wait; an unanswered prompt
    /// is treated as "no".
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;

    /// Collect a content report for `url`; `None` if the user cancels.
    async fn collect_report(&self, url: &str) -> Option<ReportInput>;

    /// Navigate to the chosen URL.
    fn open(&self, url: &str) -> anyhow::Result<()>;

    /// Surface a transient, non-fatal message.
    fn notify(&self, message: &str);
}
