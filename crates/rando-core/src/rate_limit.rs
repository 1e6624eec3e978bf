//! Client-side click throttling.
//!
//! Advisory only: it protects the counter service from accidental hammering,
//! not from a determined user.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;
use crate::error::RateLimitExceeded;

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_delay: Duration,
    max_per_minute: usize,
    clicks: VecDeque<Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}

impl RateLimiter {
    pub fn new(min_delay: Duration, max_per_minute: usize) -> Self {
        Self {
            min_delay,
            max_per_minute,
            clicks: VecDeque::new(),
        }
    }

    pub fn from_config(cfg: &RateLimitConfig) -> Self {
        Self::new(Duration::from_millis(cfg.min_delay_ms), cfg.max_per_minute)
    }

    /// Whether a click at `now` would be accepted. Does not record it.
    pub fn check(&mut self, now: Instant) -> Result<(), RateLimitExceeded> {
        self.prune(now);
        if let Some(last) = self.clicks.back() {
            let since = now.saturating_duration_since(*last);
            if since < self.min_delay {
                return Err(RateLimitExceeded::TooSoon(self.min_delay - since));
            }
        }
        if self.clicks.len() >= self.max_per_minute {
            return Err(RateLimitExceeded::TooMany(self.max_per_minute));
        }
        Ok(())
    }

    pub fn record(&mut self, now: Instant) {
        self.clicks.push_back(now);
        self.prune(now);
    }

    /// Clicks accepted in the last minute.
    pub fn recent_clicks(&self) -> usize {
        self.clicks.len()
    }

    fn prune(&mut self, now: Instant) {
        while let Some(first) = self.clicks.front() {
            if now.saturating_duration_since(*first) >= WINDOW {
                self.clicks.pop_front();
            } else {
                break;
            }
        }
    }
}
