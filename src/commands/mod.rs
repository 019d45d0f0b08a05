//! Command implementations for puppet-runner.
//!
//! Each mode returns the process exit status rather than an error: by the
//! time a command finishes, every failure has already been reported in
//! the result or on stderr.

mod run;

use crate::cli::{Cli, Command};
use crate::exit_codes;
use crate::metadata;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> i32 {
    match cli.command {
        Command::Metadata => cmd_metadata(),
        Command::Run => run::cmd_run(cli.log_json, cli.log_level),
    }
}

fn cmd_metadata() -> i32 {
    println!("{}", metadata::render());
    exit_codes::SUCCESS
}
