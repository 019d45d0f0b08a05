//! Puppet agent process plumbing.
//!
//! - **Settings**: `--configprint` lookup of report and lock paths
//! - **Dispatch**: one synchronous agent run, no retries
//! - **Env**: locale and identity fix-ups applied to every agent command

mod env;
pub mod dispatch;
mod settings;

pub use dispatch::{AgentRunOutcome, PuppetAgent, file_mtime};
pub use env::{EffectiveUser, EnvFixups};
pub use settings::AgentSettings;
