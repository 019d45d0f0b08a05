//! Flag policy for agent invocations.
//!
//! Caller-supplied flags are validated against a character class, the
//! forced defaults, and a whitelist of overridable options. The result is
//! a [`FlagSet`] in deterministic order:
//!
//! 1. validated caller flags, in the order given
//! 2. any default flag the caller did not already spell out
//! 3. `--job-id <id>` when a job id was supplied

mod tables;

#[cfg(test)]
mod tests;

pub use tables::{FlagTables, JOB_ID_FLAG};

use crate::error::{Result, RunnerError};

/// Validated, ordered flags for one agent run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSet(Vec<String>);

impl FlagSet {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl std::fmt::Display for FlagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Strip `--no-` or `--` from an option token.
pub(crate) fn base_name(flag: &str) -> &str {
    debug_assert!(flag.starts_with("--"), "not an option token: {flag}");
    flag.strip_prefix("--no-")
        .or_else(|| flag.strip_prefix("--"))
        .unwrap_or(flag)
}

/// Validate requested flags and produce the flag set for a run.
///
/// Tokens that do not start with `-` are option values and are accepted
/// only directly after an overridable option. The job id is passed through
/// as given; it reaches the agent as its own argument.
///
/// # Errors
///
/// Returns `RunnerError::InvalidInput` naming the offending token when a
/// token has characters outside `[A-Za-z0-9_:,.-]`, contradicts a forced
/// default, is not whitelisted, or misuses `--job-id`.
pub fn normalize(
    requested: &[String],
    job_id: Option<&str>,
    tables: &FlagTables,
) -> Result<FlagSet> {
    let mut flags: Vec<String> = Vec::with_capacity(requested.len() + 5);
    let mut takes_value = false;
    let mut tokens = requested.iter().map(|f| f.trim());

    while let Some(flag) = tokens.next() {
        if !tables.is_well_formed(flag) {
            return Err(RunnerError::InvalidInput(format!(
                "invalid flag '{}': only alphanumerics and '_:,.-' are allowed",
                flag
            )));
        }

        if flag == JOB_ID_FLAG {
            let value = tokens.next();
            match (value, job_id) {
                (Some(value), Some(id)) if value == id => {
                    takes_value = false;
                    continue;
                }
                _ => {
                    return Err(RunnerError::InvalidInput(format!(
                        "'{}' is set by the runner and must match the job id",
                        JOB_ID_FLAG
                    )));
                }
            }
        }

        if !flag.starts_with("--") {
            if flag.starts_with('-') || !takes_value {
                return Err(RunnerError::InvalidInput(format!(
                    "non-permitted flag '{}'",
                    flag
                )));
            }
            flags.push(flag.to_string());
            takes_value = false;
            continue;
        }

        let name = base_name(flag);
        if let Some(required) = tables.default_for(name) {
            if flag != required {
                return Err(RunnerError::InvalidInput(format!(
                    "flag '{}' conflicts with the required default '{}'",
                    flag, required
                )));
            }
            if !flags.iter().any(|f| f == flag) {
                flags.push(flag.to_string());
            }
            takes_value = false;
        } else if tables.is_overridable(name) {
            flags.push(flag.to_string());
            takes_value = true;
        } else {
            return Err(RunnerError::InvalidInput(format!(
                "non-permitted flag '{}'",
                flag
            )));
        }
    }

    for default in tables.default_flags() {
        if !flags.iter().any(|f| f == default) {
            flags.push(default.to_string());
        }
    }

    if let Some(id) = job_id {
        flags.push(JOB_ID_FLAG.to_string());
        flags.push(id.to_string());
    }

    Ok(FlagSet(flags))
}
