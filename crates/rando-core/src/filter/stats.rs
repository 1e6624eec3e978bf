//! Running filter statistics.

use serde::Serialize;
use std::collections::BTreeMap;

use super::FilterDecision;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub total_checked: u64,
    pub total_blocked: u64,
    /// Blocked decisions per rule category; blocks without a category are
    /// counted under their reason name.
    pub blocked_by_category: BTreeMap<String, u64>,
}

impl FilterStats {
    pub(super) fn record(&mut self, decision: &FilterDecision) {
        self.total_checked += 1;
        if decision.allowed {
            return;
        }
        self.total_blocked += 1;
        let key = decision
            .category
            .clone()
            .unwrap_or_else(|| decision.reason.as_str().to_string());
        *self.blocked_by_category.entry(key).or_insert(0) += 1;
    }

    /// Fraction of checked URLs that were blocked (0.0 when nothing was checked).
    pub fn block_rate(&self) -> f64 {
        if self.total_checked == 0 {
            0.0
        } else {
            self.total_blocked as f64 / self.total_checked as f64
        }
    }
}
