//! `rando validate` – full pre-navigation validation of one URL.

use anyhow::Result;

use crate::cli::context::AppContext;
use crate::cli::terminal::TerminalUi;

pub async fn run_validate(ctx: &mut AppContext, url: &str) -> Result<()> {
    let ui = TerminalUi::new(false);
    let verdict = ctx
        .validator()
        .validate_before_opening(url, &mut ctx.engine, &ui, &mut ctx.store)
        .await;
    ctx.save()?;

    let status = if verdict.safe { "safe" } else { "unsafe" };
    println!("{status}: {}", verdict.reason);
    if let Some(risk) = &verdict.risk {
        println!("risk: {}", risk.risk_level.as_str());
        if !risk.risk_factors.is_empty() {
            println!("factors: {}", risk.risk_factors.join(", "));
        }
    }
    Ok(())
}
