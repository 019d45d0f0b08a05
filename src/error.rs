//! Error types for puppet-runner.
//!
//! `ErrorKind` is the closed set of failure classes carried in a Result.
//! `RunnerError` is the internal error type; every variant knows which
//! `ErrorKind` it is reported as, so nothing escapes unclassified.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Failure classification reported to the caller as `error_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed, incomplete, or non-permitted request.
    InvalidJson,
    /// The configured agent binary does not exist.
    NoPuppetBin,
    /// The report location is unknown, or the report is missing/unwritten.
    NoLastRunReport,
    /// The report exists but cannot be parsed.
    InvalidLastRunReport,
    /// The agent is administratively disabled.
    AgentDisabled,
    /// The agent process could not be spawned.
    #[serde(rename = "agent_failed_to_start")]
    FailedToStart,
    /// The agent ran and exited non-zero with no better explanation.
    AgentExitNonZero,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ErrorKind::InvalidJson => "invalid_json",
            ErrorKind::NoPuppetBin => "no_puppet_bin",
            ErrorKind::NoLastRunReport => "no_last_run_report",
            ErrorKind::InvalidLastRunReport => "invalid_last_run_report",
            ErrorKind::AgentDisabled => "agent_disabled",
            ErrorKind::FailedToStart => "agent_failed_to_start",
            ErrorKind::AgentExitNonZero => "agent_exit_non_zero",
        };
        f.write_str(tag)
    }
}

/// Internal error type for puppet-runner operations.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The request or one of its flags was rejected.
    #[error("{0}")]
    InvalidInput(String),

    /// The agent binary is not present.
    #[error("Puppet executable '{}' does not exist", .0.display())]
    MissingBinary(PathBuf),

    /// The agent settings did not name a report location.
    #[error("could not determine the location of the last run report")]
    UnknownReportLocation,

    /// No report exists at the expected path.
    #[error("{} doesn't exist", .0.display())]
    ReportMissing(PathBuf),

    /// The report was not touched by the last run.
    #[error("{} was not written (unchanged since before the run)", .0.display())]
    ReportUnchanged(PathBuf),

    /// The report could not be read or decoded.
    #[error("{} could not be loaded: {}", .path.display(), .reason)]
    ReportUnreadable { path: PathBuf, reason: String },

    /// The agent's disabled lock is present.
    #[error("Puppet agent is disabled")]
    AgentDisabled,

    /// The agent process could not be spawned.
    #[error("failed to start Puppet agent '{}': {}", .program.display(), .reason)]
    FailedToStart { program: PathBuf, reason: String },

    /// The agent exited with a non-zero code.
    #[error("Puppet agent exited with a non-zero exit code ({0})")]
    NonZeroExit(i32),
}

impl RunnerError {
    /// Returns the classification this error is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunnerError::InvalidInput(_) => ErrorKind::InvalidJson,
            RunnerError::MissingBinary(_) => ErrorKind::NoPuppetBin,
            RunnerError::UnknownReportLocation
            | RunnerError::ReportMissing(_)
            | RunnerError::ReportUnchanged(_) => ErrorKind::NoLastRunReport,
            RunnerError::ReportUnreadable { .. } => ErrorKind::InvalidLastRunReport,
            RunnerError::AgentDisabled => ErrorKind::AgentDisabled,
            RunnerError::FailedToStart { .. } => ErrorKind::FailedToStart,
            RunnerError::NonZeroExit(_) => ErrorKind::AgentExitNonZero,
        }
    }
}

/// Result type alias for puppet-runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_classified_invalid_json() {
        let err = RunnerError::InvalidInput("bad flag".to_string());
        assert_eq!(err.kind(), ErrorKind::InvalidJson);
        assert_eq!(err.to_string(), "bad flag");
    }

    #[test]
    fn report_errors_share_a_kind() {
        let missing = RunnerError::ReportMissing(PathBuf::from("/tmp/r.yaml"));
        let unchanged = RunnerError::ReportUnchanged(PathBuf::from("/tmp/r.yaml"));
        assert_eq!(missing.kind(), ErrorKind::NoLastRunReport);
        assert_eq!(unchanged.kind(), ErrorKind::NoLastRunReport);
        assert_eq!(
            RunnerError::UnknownReportLocation.kind(),
            ErrorKind::NoLastRunReport
        );
        assert_ne!(missing.to_string(), unchanged.to_string());
        assert!(unchanged.to_string().contains("not written"));
    }

    #[test]
    fn spawn_error_is_failed_to_start() {
        let err = RunnerError::FailedToStart {
            program: PathBuf::from("/nope/puppet"),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::FailedToStart);
        assert!(err.to_string().contains("/nope/puppet"));
    }

    #[test]
    fn error_kinds_serialize_as_wire_tags() {
        let tags = [
            (ErrorKind::InvalidJson, "invalid_json"),
            (ErrorKind::NoPuppetBin, "no_puppet_bin"),
            (ErrorKind::NoLastRunReport, "no_last_run_report"),
            (ErrorKind::InvalidLastRunReport, "invalid_last_run_report"),
            (ErrorKind::AgentDisabled, "agent_disabled"),
            (ErrorKind::FailedToStart, "agent_failed_to_start"),
            (ErrorKind::AgentExitNonZero, "agent_exit_non_zero"),
        ];
        for (kind, tag) in tags {
            assert_eq!(serde_json::to_value(kind).unwrap(), tag);
            assert_eq!(kind.to_string(), tag);
        }
    }
}
