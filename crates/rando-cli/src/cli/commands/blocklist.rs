//! `rando blocklist` – edit and list blocked domains.
//!
//! Edits are stored in the state file and replayed on top of whatever rule
//! configuration is loaded next time.

use anyhow::Result;
use rando_core::rules::normalize_domain_input;
use rando_core::store::BlocklistAction;

use crate::cli::context::AppContext;
use crate::cli::BlocklistCommand;

pub fn run_blocklist(ctx: &mut AppContext, action: BlocklistCommand) -> Result<()> {
    match action {
        BlocklistCommand::Add { domains, category } => {
            for item in ctx.engine.bulk_add_blocked_domains(domains.as_slice(), &category) {
                match item.outcome {
                    Ok(added) => {
                        let domain = normalize_domain_input(&item.input);
                        ctx.store
                            .record_blocklist_change(BlocklistAction::Add, &domain, category.trim());
                        let note = if added { "blocked" } else { "already blocked" };
                        println!("{domain}: {note}");
                    }
                    Err(e) => eprintln!("{}: {e}", item.input),
                }
            }
            ctx.save()?;
        }
        BlocklistCommand::Remove { domains, category } => {
            for input in &domains {
                match ctx.engine.remove_blocked_domain(input, &category) {
                    Ok(removed) => {
                        let domain = normalize_domain_input(input);
                        ctx.store
                            .record_blocklist_change(BlocklistAction::Remove, &domain, category.trim());
                        let note = if removed { "unblocked" } else { "was not blocked" };
                        println!("{domain}: {note}");
                    }
                    Err(e) => eprintln!("{input}: {e}"),
                }
            }
            ctx.save()?;
        }
        BlocklistCommand::List => {
            let config = ctx.engine.rules().config();
            if config.blocked_domains.is_empty() {
                println!("No blocked domains.");
            }
            for (category, domains) in &config.blocked_domains {
                println!("{category}:");
                for d in domains {
                    println!("  {d}");
                }
            }
        }
    }
    Ok(())
}
