//! Terminal implementation of the user interaction capability.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rando_core::interaction::{ConfirmPrompt, Interaction};
use rando_core::report::{ReportInput, ReportReason};
use std::io::Write;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Spawn `program url` detached from the terminal. The returned task reaps
/// the child so no zombie is left behind; callers may ignore it.
pub(crate) fn launch(program: &str, url: &str) -> Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = Command::new(program)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("launch {program}"))?;
    let program = program.to_string();
    Ok(tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => {
                if !status.success() {
                    tracing::debug!(%program, %status, "browser launcher exited unsuccessfully");
                }
                Some(status)
            }
            Err(e) => {
                tracing::warn!(%program, "failed to wait for browser launcher: {e}");
                None
            }
        }
    }))
}

pub struct TerminalUi {
    input: Mutex<Lines<BufReader<Stdin>>>,
    launch_browser: bool,
}

impl TerminalUi {
    pub fn new(launch_browser: bool) -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            launch_browser,
        }
    }

    /// Next line from stdin, `None` at end of input.
    pub async fn read_line(&self) -> Result<Option<String>> {
        let mut input = self.input.lock().await;
        Ok(input.next_line().await?)
    }

    async fn ask(&self, question: &str) -> Option<String> {
        print!("{question}");
        let _ = std::io::stdout().flush();
        match self.read_line().await {
            Ok(line) => line.map(|l| l.trim().to_string()),
            Err(e) => {
                tracing::warn!("failed to read answer: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl Interaction for TerminalUi {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        let answer = self.ask(&format!("{} [y/N] ", prompt.message())).await;
        matches!(answer.as_deref().map(str::to_ascii_lowercase).as_deref(), Some("y" | "yes"))
    }

    async fn collect_report(&self, url: &str) -> Option<ReportInput> {
        let names: Vec<&str> = ReportReason::ALL.iter().map(|r| r.as_str()).collect();
        let reason = loop {
            let answer = self
                .ask(&format!("Reason for reporting {url} ({}, empty to cancel): ", names.join("/")))
                .await?;
            if answer.is_empty() {
                return None;
            }
            match answer.parse::<ReportReason>() {
                Ok(reason) => break reason,
                Err(e) => eprintln!("{e}"),
            }
        };
        let description = self.ask("Description (optional): ").await.unwrap_or_default();
        let email = self
            .ask("Email for follow-up (optional): ")
            .await
            .filter(|e| !e.is_empty());
        Some(ReportInput {
            url: url.to_string(),
            reason,
            description,
            email,
        })
    }

    fn open(&self, url: &str) -> Result<()> {
        println!("{url}");
        if self.launch_browser {
            launch("xdg-open", url)?;
        }
        Ok(())
    }

    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}
