//! Filesystem utilities for puppet-runner.
//!
//! The caller reads the exit code file as soon as it appears, so it must
//! never be observed half-written.

pub mod atomic;

pub use atomic::atomic_write;
