//! Config struct definitions and defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one orchestration pass.
///
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Path to the Puppet executable.
    #[serde(default = "default_puppet_bin")]
    pub puppet_bin: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            puppet_bin: default_puppet_bin(),
        }
    }
}

/// Platform-specific default location of the Puppet executable.
#[cfg(windows)]
pub fn default_puppet_bin() -> PathBuf {
    PathBuf::from(r"C:\Program Files\Puppet Labs\Puppet\bin\puppet.bat")
}

/// Platform-specific default location of the Puppet executable.
#[cfg(not(windows))]
pub fn default_puppet_bin() -> PathBuf {
    PathBuf::from("/opt/puppetlabs/bin/puppet")
}

/// Bounds on waiting for a concurrently running agent to release its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockWaitPolicy {
    /// Delay between existence checks of the lock file.
    pub poll_interval: Duration,
    /// Give up waiting after this long and retry anyway.
    pub max_wait: Duration,
}

impl Default for LockWaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            max_wait: Duration::from_secs(600),
        }
    }
}
