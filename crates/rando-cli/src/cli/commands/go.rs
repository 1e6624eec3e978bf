//! `rando go` – pick, validate and print one random website.

use anyhow::Result;
use rando_core::controller::ClickOutcome;
use rando_core::counter::{CountReading, CountSource};
use std::time::Instant;

use crate::cli::context::AppContext;

pub async fn run_go(ctx: AppContext, open: bool) -> Result<()> {
    let mut controller = ctx.into_controller(open);
    controller.start().await;
    let outcome = controller.click(Instant::now()).await;
    print_outcome(&outcome);
    match outcome {
        ClickOutcome::Navigated { .. } => Ok(()),
        ClickOutcome::OpenFailed { error, .. } => anyhow::bail!("could not open website: {error}"),
        _ => anyhow::bail!("no website opened"),
    }
}

/// Summary line for a click; the URL itself is printed by the terminal UI.
pub fn print_outcome(outcome: &ClickOutcome) {
    match outcome {
        ClickOutcome::Navigated { count, fallback, .. } => {
            if *fallback {
                eprintln!("No catalog entry passed the filter; using the safe fallback.");
            }
            eprintln!("Websites opened: {}", count_label(count));
        }
        ClickOutcome::Busy => eprintln!("Still working on the previous pick."),
        // Refusals are already reported through the terminal UI.
        ClickOutcome::RateLimited(_) | ClickOutcome::Rejected { .. } | ClickOutcome::OpenFailed { .. } => {}
    }
}

pub fn count_label(count: &CountReading) -> String {
    match count.source {
        CountSource::Remote => count.value.to_string(),
        CountSource::Fallback => format!("{} (local count)", count.value),
    }
}
