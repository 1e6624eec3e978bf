//! Per-process mutable state for the click cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::filter::FilterEngine;
use crate::history::VisitHistory;
use crate::rate_limit::RateLimiter;

/// Where the current click is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickPhase {
    #[default]
    Idle,
    RateLimitCheck,
    Selecting,
    /// Structure, filter and safety checks, including any risk confirmation.
    Validating,
    Navigating,
}

impl ClickPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ClickPhase::Idle => "idle",
            ClickPhase::RateLimitCheck => "rate_limit_check",
            ClickPhase::Selecting => "selecting",
            ClickPhase::Validating => "validating",
            ClickPhase::Navigating => "navigating",
        }
    }
}

pub struct Session {
    pub engine: FilterEngine,
    pub history: VisitHistory,
    pub rate_limiter: RateLimiter,
    loading: Arc<AtomicBool>,
    phase: ClickPhase,
}

impl Session {
    pub fn new(engine: FilterEngine, rate_limiter: RateLimiter) -> Self {
        Self {
            engine,
            history: VisitHistory::new(),
            rate_limiter,
            loading: Arc::new(AtomicBool::new(false)),
            phase: ClickPhase::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Shared handle to the loading flag, for front ends that poll it.
    pub fn loading_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.loading)
    }

    pub fn phase(&self) -> ClickPhase {
        self.phase
    }

    pub(super) fn enter(&mut self, phase: ClickPhase) {
        tracing::trace!(from = self.phase.as_str(), to = phase.as_str(), "click phase");
        self.phase = phase;
    }
}

/// Holds the loading flag for one click and clears it on drop, so a
/// cancelled click does not leave the session stuck.
pub(super) struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl LoadingGuard {
    /// `None` if a click is already in flight.
    pub(super) fn acquire(flag: Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = Arc::new(AtomicBool::new(false));
        let guard = LoadingGuard::acquire(Arc::clone(&flag)).unwrap();
        assert!(LoadingGuard::acquire(Arc::clone(&flag)).is_none());
        drop(guard);
        assert!(!flag.load(Ordering::SeqCst));
        assert!(LoadingGuard::acquire(flag).is_some());
    }
}
