//! Process exit codes for puppet-runner.
//!
//! These are the runner's own statuses, not the agent's:
//! - 0: Result produced without an error
//! - 1: Result produced with an error
//! - 5: Output files could not be set up or written

/// A Result without `error` was emitted.
pub const SUCCESS: i32 = 0;

/// A Result carrying `error`/`error_type` was emitted.
pub const RUN_FAILURE: i32 = 1;

/// The requested output files could not be honored; no Result was emitted.
pub const OUTPUT_FILES_FAILURE: i32 = 5;

/// Placeholder for `exitcode` when the agent never produced one.
pub const UNKNOWN_AGENT_EXIT: i32 = -1;
