//! `rando report` – store a content report.

use anyhow::Result;
use rando_core::report::{submit_report, ReportInput, ReportReason};
use std::time::SystemTime;

use crate::cli::context::AppContext;

pub fn run_report(
    ctx: &mut AppContext,
    url: String,
    reason: ReportReason,
    description: String,
    email: Option<String>,
) -> Result<()> {
    let input = ReportInput {
        url,
        reason,
        description,
        email,
    };
    let report = submit_report(input, &mut ctx.store, SystemTime::now())?;
    ctx.save()?;
    println!("Reported {} as {}. Thank you.", report.url, report.reason.as_str());
    Ok(())
}
