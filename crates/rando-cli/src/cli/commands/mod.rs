//! CLI command handlers, one file per command.

mod blocklist;
mod check;
mod counter;
mod go;
mod report;
mod shell;
mod validate;

pub use blocklist::run_blocklist;
pub use check::run_check;
pub use counter::run_counter;
pub use go::{count_label, print_outcome, run_go};
pub use report::run_report;
pub use shell::run_shell;
pub use validate::run_validate;

#[cfg(test)]
pub(crate) use shell::{parse_shell_input, ShellInput};
