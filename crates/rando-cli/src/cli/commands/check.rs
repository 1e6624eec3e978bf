//! `rando check` – print the filter decision for a URL as JSON.

use anyhow::Result;

use crate::cli::context::AppContext;

pub fn run_check(ctx: &mut AppContext, url: &str, title: &str, description: &str) -> Result<()> {
    let decision = ctx.engine.evaluate(url, title, description);
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}
