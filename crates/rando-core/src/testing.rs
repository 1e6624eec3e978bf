//! Test doubles shared by unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::interaction::{ConfirmPrompt, Interaction};
use crate::report::ReportInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Never,
}

/// An `Interaction` that answers every prompt the same way and records
/// what it was asked to do.
pub struct ScriptedUi {
    answer: Answer,
    pub confirms: AtomicUsize,
    pub opened: Mutex<Vec<String>>,
    pub notices: Mutex<Vec<String>>,
    pub report: Mutex<Option<ReportInput>>,
    pub fail_open: bool,
}

impl ScriptedUi {
    pub fn new(answer: Answer) -> Self {
        Self {
            answer,
            confirms: AtomicUsize::new(0),
            opened: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            report: Mutex::new(None),
            fail_open: false,
        }
    }

    pub fn confirm_count(&self) -> usize {
        self.confirms.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Interaction for ScriptedUi {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        self.confirms.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            Answer::Yes => true,
            Answer::No => false,
            Answer::Never => std::future::pending().await,
        }
    }

    async fn collect_report(&self, _url: &str) -> Option<ReportInput> {
        self.report.lock().unwrap().take()
    }

    fn open(&self, url: &str) -> anyhow::Result<()> {
        if self.fail_open {
            anyhow::bail!("no browser");
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

/// A counter service that is never reachable.
pub struct OfflineCounter;

#[async_trait]
impl crate::counter::CounterApi for OfflineCounter {
    async fn create(&self) -> Result<String, crate::error::CounterError> {
        Err(crate::error::CounterError::Http(503))
    }

    async fn read(&self, _id: &str) -> Result<u64, crate::error::CounterError> {
        Err(crate::error::CounterError::Http(503))
    }

    async fn increment(&self, _id: &str) -> Result<u64, crate::error::CounterError> {
        Err(crate::error::CounterError::Http(503))
    }
}
