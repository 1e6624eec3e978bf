//! Global click counter with a local fallback.
//!
//! The remote id and the fallback value live in the state store so they
//! survive restarts. Remote failures never surface to the caller: after the
//! retry budget is spent the local counter is bumped instead.

mod api;

pub use api::{parse_count, CounterApi, CurlCounterApi};

use crate::retry::{run_with_retry, RetryPolicy};
use crate::store::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountReading {
    pub value: u64,
    pub source: CountSource,
}

impl CountReading {
    fn remote(value: u64) -> Self {
        Self {
            value,
            source: CountSource::Remote,
        }
    }

    fn fallback(value: u64) -> Self {
        Self {
            value,
            source: CountSource::Fallback,
        }
    }
}

pub struct ClickCounter<A> {
    api: A,
    policy: RetryPolicy,
    counter_id: Option<String>,
    fallback_count: u64,
}

impl<A: CounterApi> ClickCounter<A> {
    pub fn new(api: A, policy: RetryPolicy) -> Self {
        Self {
            api,
            policy,
            counter_id: None,
            fallback_count: 0,
        }
    }

    pub fn counter_id(&self) -> Option<&str> {
        self.counter_id.as_deref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Reuse the persisted id if the service still knows it, otherwise
    /// create a new counter. Returns false when running on the fallback.
    pub async fn initialize(&mut self, store: &mut StateStore) -> bool {
        self.fallback_count = store.fallback_count();

        if let Some(saved) = store.counter_id().map(str::to_string) {
            match self.api.read(&saved).await {
                Ok(_) => {
                    tracing::debug!(id = %saved, "reusing counter");
                    self.counter_id = Some(saved);
                    return true;
                }
                Err(e) => tracing::warn!(id = %saved, error = %e, "saved counter is not usable"),
            }
        }

        match self.api.create().await {
            Ok(id) => {
                tracing::info!(%id, "created counter");
                store.set_counter_id(Some(id.clone()));
                self.counter_id = Some(id);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "counter unavailable, using local fallback");
                self.counter_id = None;
                false
            }
        }
    }

    /// Current count; the fallback value if the service cannot be read.
    pub async fn current(&self) -> CountReading {
        let Some(id) = self.counter_id.as_deref() else {
            return CountReading::fallback(self.fallback_count);
        };
        match self.api.read(id).await {
            Ok(n) => CountReading::remote(n),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read counter");
                CountReading::fallback(self.fallback_count)
            }
        }
    }

    /// Increment the remote counter with retries, or the local one if there
    /// is no remote id or every attempt failed.
    pub async fn increment(&mut self, store: &mut StateStore) -> CountReading {
        if let Some(id) = self.counter_id.clone() {
            let api = &self.api;
            let res = run_with_retry(&self.policy, "counter increment", || api.increment(&id)).await;
            match res {
                Ok(n) => return CountReading::remote(n),
                Err(e) => tracing::warn!(error = %e, "counter increment failed, using local fallback"),
            }
        }
        self.fallback_count += 1;
        store.set_fallback_count(self.fallback_count);
        CountReading::fallback(self.fallback_count)
    }
}
