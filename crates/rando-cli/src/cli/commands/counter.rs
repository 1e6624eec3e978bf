//! `rando counter` – show the global click count.

use anyhow::Result;
use rando_core::counter::CountSource;

use crate::cli::context::AppContext;

pub async fn run_counter(mut ctx: AppContext) -> Result<()> {
    let mut counter = ctx.click_counter();
    counter.initialize(&mut ctx.store).await;
    ctx.save()?;
    let reading = counter.current().await;
    match reading.source {
        CountSource::Remote => println!("{}", reading.value),
        CountSource::Fallback => println!("{} (local count, counter service unavailable)", reading.value),
    }
    Ok(())
}
