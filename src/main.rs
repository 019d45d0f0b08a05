//! puppet-runner: runs the Puppet agent once and reports the outcome.
//!
//! This is the main entry point for the `puppet-runner` CLI. It parses
//! arguments and dispatches to the selected mode, which returns the
//! process exit status.

mod cli;
mod commands;
pub mod agent;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod flags;
pub mod fs;
pub mod logging;
pub mod metadata;
pub mod orchestrator;
pub mod output;
pub mod report;
pub mod request;
pub mod result;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let code = commands::dispatch(cli);
    ExitCode::from(code as u8)
}
