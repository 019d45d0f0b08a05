//! Run configuration for puppet-runner.
//!
//! `RunConfig` is built from the caller's `configuration` object merged
//! over built-in defaults. Unknown keys are ignored for forward
//! compatibility. `LockWaitPolicy` bounds the wait for a competing run.

mod model;
mod operations;


pub use model::{LockWaitPolicy, RunConfig, default_puppet_bin};
