//! `rando shell` – interactive picking session.

use anyhow::Result;
use rando_core::counter::CurlCounterApi;
use rando_core::controller::Controller;
use rando_core::error::ReportError;
use std::time::Instant;

use super::{count_label, print_outcome};
use crate::cli::context::AppContext;
use crate::cli::terminal::TerminalUi;

const HELP: &str =
    "Enter: random website   r <url>: report   s: stats   h: history   c: clear filter cache   q: quit";

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ShellInput<'a> {
    Click,
    Report(Option<&'a str>),
    Stats,
    History,
    ClearCache,
    Help,
    Quit,
    Unknown(&'a str),
}

pub(crate) fn parse_shell_input(line: &str) -> ShellInput<'_> {
    let line = line.trim();
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((c, a)) => (c, Some(a.trim()).filter(|a| !a.is_empty())),
        None => (line, None),
    };
    match cmd {
        "" | "g" | "go" => ShellInput::Click,
        "r" | "report" => ShellInput::Report(arg),
        "s" | "stats" => ShellInput::Stats,
        "h" | "history" => ShellInput::History,
        "c" | "clear" => ShellInput::ClearCache,
        "?" | "help" => ShellInput::Help,
        "q" | "quit" | "exit" => ShellInput::Quit,
        other => ShellInput::Unknown(other),
    }
}

pub async fn run_shell(ctx: AppContext, open: bool) -> Result<()> {
    let mut controller = ctx.into_controller(open);
    if !controller.start().await {
        eprintln!("Counter service unavailable; counting locally.");
    }
    println!("{HELP}");

    while let Some(line) = controller.ui().read_line().await? {
        match parse_shell_input(&line) {
            ShellInput::Click => {
                let outcome = controller.click(Instant::now()).await;
                print_outcome(&outcome);
            }
            ShellInput::Report(url) => report(&mut controller, url).await,
            ShellInput::Stats => print_stats(&controller).await,
            ShellInput::History => {
                for visit in controller.session().history.recent(10) {
                    let repeat = if visit.is_repeat { " (repeat)" } else { "" };
                    println!("{} {}{repeat}", visit.timestamp, visit.url);
                }
            }
            ShellInput::ClearCache => {
                let engine = &mut controller.session_mut().engine;
                let dropped = engine.cache_len();
                engine.clear_cache();
                println!("Cleared {dropped} cached filter decisions.");
            }
            ShellInput::Help => println!("{HELP}"),
            ShellInput::Quit => break,
            ShellInput::Unknown(cmd) => eprintln!("unknown command {cmd:?}; {HELP}"),
        }
    }
    Ok(())
}

async fn report(controller: &mut Controller<CurlCounterApi, TerminalUi>, url: Option<&str>) {
    let Some(url) = url
        .map(str::to_string)
        .or_else(|| controller.session().history.last().map(|v| v.url.clone()))
    else {
        eprintln!("Nothing to report yet; use `r <url>`.");
        return;
    };
    match controller.report(&url).await {
        Ok(r) => println!("Reported {} as {}. Thank you.", r.url, r.reason.as_str()),
        Err(ReportError::Cancelled) => println!("Report cancelled."),
        Err(e) => eprintln!("Report not saved: {e}"),
    }
}

/// Filter statistics, history totals and a fresh read of the click counter.
async fn print_stats(controller: &Controller<CurlCounterApi, TerminalUi>) {
    let count = controller.counter().current().await;
    println!("websites opened {}", count_label(&count));
    let stats = controller.session().engine.stats();
    println!(
        "checked {}  blocked {}  block rate {:.1}%",
        stats.total_checked,
        stats.total_blocked,
        stats.block_rate() * 100.0
    );
    for (category, n) in &stats.blocked_by_category {
        println!("  {category:<20} {n}");
    }
    let history = &controller.session().history;
    println!("visits {}  repeats {}", history.len(), history.repeat_count());
}
