//! Agent subprocess dispatch.
//!
//! Runs the Puppet executable synchronously with the fixed-up environment,
//! capturing its output into the log rather than the result channel.

mod executor;

pub use executor::{AgentRunOutcome, PuppetAgent, file_mtime};
