//! The `run` command: one request in, one result out.

use crate::agent::{EnvFixups, PuppetAgent};
use crate::config::{LockWaitPolicy, RunConfig};
use crate::error::{Result, RunnerError};
use crate::exit_codes::{OUTPUT_FILES_FAILURE, UNKNOWN_AGENT_EXIT};
use crate::flags::{self, FlagTables};
use crate::logging::init_tracing;
use crate::orchestrator::RunOrchestrator;
use crate::output::OutputSink;
use crate::request::Request;
use crate::result::RunResult;
use std::io::Read;
use tracing::{Level, info, warn};

pub fn cmd_run(log_json: bool, log_level: Level) -> i32 {
    let request = read_request();

    let sink = match request.as_ref().ok().and_then(|r| r.output_files.clone()) {
        Some(files) => match OutputSink::open(files) {
            Ok(sink) => sink,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                return OUTPUT_FILES_FAILURE;
            }
        },
        None => OutputSink::stdio(),
    };
    init_tracing(log_json, log_level, sink.log_writer());

    let result = match request {
        Ok(request) => execute(&request, LockWaitPolicy::default(), EnvFixups::detect()),
        Err(e) => {
            warn!(error = %e, "rejected request");
            RunResult::from_error(UNKNOWN_AGENT_EXIT, &e)
        }
    };

    match sink.finish(&result) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            OUTPUT_FILES_FAILURE
        }
    }
}

fn read_request() -> Result<Request> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|e| RunnerError::InvalidInput(format!("failed to read request: {}", e)))?;
    Request::parse(&raw)
}

/// Validate a decoded request and run the agent for it.
///
/// Request problems become an `invalid_json` result before the agent is
/// looked at.
pub fn execute(request: &Request, lock_wait: LockWaitPolicy, env: EnvFixups) -> RunResult {
    match prepare(request, lock_wait, env) {
        Ok(orchestrator) => orchestrator.run(),
        Err(e) => {
            warn!(error = %e, "rejected request");
            RunResult::from_error(UNKNOWN_AGENT_EXIT, &e)
        }
    }
}

fn prepare(request: &Request, lock_wait: LockWaitPolicy, env: EnvFixups) -> Result<RunOrchestrator> {
    let input = request.input()?;
    let config = RunConfig::from_overrides(request.configuration())?;
    let flags = flags::normalize(&input.flags, input.job.as_deref(), FlagTables::global())?;

    info!(puppet_bin = %config.puppet_bin.display(), flags = %flags, "run requested");
    Ok(RunOrchestrator::new(
        PuppetAgent::new(&config, env),
        flags,
        lock_wait,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use tempfile::TempDir;

    fn request(value: serde_json::Value) -> Request {
        Request::parse(&value.to_string()).unwrap()
    }

    fn run(value: serde_json::Value) -> RunResult {
        execute(&request(value), LockWaitPolicy::default(), EnvFixups::default())
    }

    #[test]
    fn missing_input_is_invalid_json() {
        let result = run(json!({"configuration": {}}));
        assert_eq!(result.error_type, Some(ErrorKind::InvalidJson));
        assert_eq!(result.exitcode, UNKNOWN_AGENT_EXIT);
    }

    #[test]
    fn disallowed_flag_is_invalid_json() {
        let result = run(json!({"input": {"flags": ["--server", "evil"]}}));
        assert_eq!(result.error_type, Some(ErrorKind::InvalidJson));
        assert!(result.error.unwrap().contains("--server"));
    }

    #[test]
    fn bad_configuration_is_invalid_json() {
        let result = run(json!({"configuration": "nope", "input": {"flags": []}}));
        assert_eq!(result.error_type, Some(ErrorKind::InvalidJson));
    }

    #[test]
    fn request_checked_before_binary() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("puppet");
        let result = run(json!({
            "configuration": {"puppet_bin": missing},
            "input": {"flags": ["--bogus"]}
        }));
        assert_eq!(result.error_type, Some(ErrorKind::InvalidJson));
    }

    #[test]
    fn missing_binary_from_configuration() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("puppet");
        let result = run(json!({
            "configuration": {"puppet_bin": missing},
            "input": {"flags": ["--noop"], "job": "9"}
        }));
        assert_eq!(result.error_type, Some(ErrorKind::NoPuppetBin));
        assert_eq!(result.exitcode, UNKNOWN_AGENT_EXIT);
    }

    #[cfg(unix)]
    #[test]
    fn runs_agent_with_normalized_flags() {
        use crate::test_support::write_configured_puppet;

        let temp_dir = TempDir::new().unwrap();
        let state = temp_dir.path().join("state");
        std::fs::create_dir_all(&state).unwrap();
        let args_file = temp_dir.path().join("args");
        let puppet = write_configured_puppet(
            temp_dir.path(),
            &state,
            &format!(
                "echo \"$@\" > '{}'\n\
                 printf 'status: unchanged\\nenvironment: production\\n' > '{}/last_run_report.yaml'\n\
                 exit 0",
                args_file.display(),
                state.display()
            ),
        );

        let result = run(json!({
            "configuration": {"puppet_bin": puppet},
            "input": {"flags": ["--noop", "--environment", "dev"], "job": "31"}
        }));

        assert!(!result.is_error(), "{:?}", result);
        assert_eq!(result.status, "unchanged");
        assert_eq!(result.environment, "production");
        let args = std::fs::read_to_string(&args_file).unwrap();
        assert_eq!(
            args.trim(),
            "agent --noop --environment dev --onetime --no-daemonize --verbose --job-id 31"
        );
    }
}
