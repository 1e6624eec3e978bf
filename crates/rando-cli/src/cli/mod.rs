//! CLI for Rando, the filtered random website picker.

mod commands;
mod context;
mod terminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rando_core::report::ReportReason;
use std::path::PathBuf;

use commands::{
    run_blocklist, run_check, run_counter, run_go, run_report, run_shell, run_validate,
};
use context::AppContext;

/// Top-level CLI for Rando.
#[derive(Debug, Parser)]
#[command(name = "rando")]
#[command(about = "Rando: open a random website that passed the content filter", long_about = None)]
pub struct Cli {
    /// Catalog JSON file of the form {"category": ["https://...", ...]}.
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Pick one random website and print it.
    Go {
        /// Also open it with xdg-open.
        #[arg(long)]
        open: bool,
    },

    /// Interactive session: Enter picks a website, `r <url>` reports one, `s` shows stats, `q` quits.
    Shell {
        /// Open picked websites with xdg-open.
        #[arg(long)]
        open: bool,
    },

    /// Print the content filter decision for a URL.
    Check {
        url: String,
        /// Page title to include in keyword matching.
        #[arg(long, default_value = "")]
        title: String,
        /// Page description to include in keyword matching.
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Run the full pre-navigation validation for a URL.
    Validate { url: String },

    /// Manage the domain blocklist.
    Blocklist {
        #[command(subcommand)]
        action: BlocklistCommand,
    },

    /// Report a website.
    Report {
        url: String,
        /// inappropriate, malware, phishing, spam, broken or other.
        #[arg(long)]
        reason: ReportReason,
        #[arg(long, default_value = "")]
        description: String,
        /// Contact address for follow-up.
        #[arg(long)]
        email: Option<String>,
    },

    /// Show the global click count.
    Counter,
}

#[derive(Debug, Subcommand)]
pub enum BlocklistCommand {
    /// Block one or more domains (`*.example.com` wildcards allowed).
    Add {
        #[arg(required = true)]
        domains: Vec<String>,
        #[arg(long, default_value = "custom")]
        category: String,
    },

    /// Unblock one or more domains.
    Remove {
        #[arg(required = true)]
        domains: Vec<String>,
        #[arg(long, default_value = "custom")]
        category: String,
    },

    /// List blocked domains by category.
    List,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut ctx = AppContext::load(cli.catalog.as_deref()).await?;
        tracing::debug!("loaded config: {:?}", ctx.cfg);

        match cli.command {
            CliCommand::Go { open } => run_go(ctx, open).await?,
            CliCommand::Shell { open } => run_shell(ctx, open).await?,
            CliCommand::Check {
                url,
                title,
                description,
            } => run_check(&mut ctx, &url, &title, &description)?,
            CliCommand::Validate { url } => run_validate(&mut ctx, &url).await?,
            CliCommand::Blocklist { action } => run_blocklist(&mut ctx, action)?,
            CliCommand::Report {
                url,
                reason,
                description,
                email,
            } => run_report(&mut ctx, url, reason, description, email)?,
            CliCommand::Counter => run_counter(ctx).await?,
        }

        Ok(())
    }
}
