//! CLI argument parsing for puppet-runner.
//!
//! The request itself arrives as JSON on stdin; the command line only
//! selects the mode and how diagnostics are logged.

use clap::{Parser, Subcommand};
use tracing::Level;

/// Runs the Puppet agent once and reports the outcome as a JSON result.
#[derive(Parser, Debug)]
#[command(name = "puppet-runner")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Default log verbosity (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: Level,

    /// Emit logs as newline-delimited JSON.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available modes.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the capability descriptor.
    Metadata,

    /// Read a run request from stdin and run the agent.
    ///
    /// Emits exactly one JSON result, to stdout or to the requested
    /// output files.
    Run,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
