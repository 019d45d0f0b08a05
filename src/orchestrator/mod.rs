//! One orchestration pass: run the agent, classify the outcome.
//!
//! ```text
//! CheckBinary -> Configure -> FirstAttempt
//!   exit 0  -> Reconcile
//!   exit !0 -> CheckDisabled -> CheckLock -> [Wait -> SecondAttempt] -> Reconcile
//! ```
//!
//! A non-zero exit while the catalog run lock is held means another agent
//! was busy, so the run is retried once after the lock clears. The lock
//! can be re-taken between the wait and the retry; that race is accepted.
//! The disabled lock is not re-checked after the retry.


use crate::agent::{AgentRunOutcome, PuppetAgent};
use crate::config::LockWaitPolicy;
use crate::error::RunnerError;
use crate::exit_codes::UNKNOWN_AGENT_EXIT;
use crate::flags::FlagSet;
use crate::report;
use crate::result::RunResult;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Drives the agent through one run and produces its result.
#[derive(Debug)]
pub struct RunOrchestrator {
    agent: PuppetAgent,
    flags: FlagSet,
    lock_wait: LockWaitPolicy,
}

impl RunOrchestrator {
    pub fn new(agent: PuppetAgent, flags: FlagSet, lock_wait: LockWaitPolicy) -> Self {
        Self {
            agent,
            flags,
            lock_wait,
        }
    }

    /// Run the state machine to completion.
    ///
    /// Every path, including early failures, ends in a `RunResult`.
    pub fn run(&self) -> RunResult {
        if !self.agent.is_installed() {
            let err = RunnerError::MissingBinary(self.agent.program().to_path_buf());
            warn!(error = %err, "agent binary check failed");
            return RunResult::from_error(UNKNOWN_AGENT_EXIT, &err);
        }

        let settings = self.agent.query_settings();
        let Some(report_path) = settings.last_run_report.as_deref() else {
            warn!("agent settings do not name a last run report");
            return RunResult::from_error(UNKNOWN_AGENT_EXIT, &RunnerError::UnknownReportLocation);
        };

        let first = self.agent.run(&self.flags, report_path);
        let exit_code = match self.exit_code_of(&first) {
            Ok(code) => code,
            Err(result) => return result,
        };

        let last = if exit_code == 0 {
            first
        } else {
            if lock_present(settings.disabled_lock.as_deref()) {
                info!(exit_code, "agent is disabled");
                return RunResult::from_error(exit_code, &RunnerError::AgentDisabled);
            }

            match settings.catalog_run_lock.as_deref() {
                Some(lock) if lock.exists() => {
                    info!(
                        exit_code,
                        lock = %lock.display(),
                        "another agent run is in progress; waiting to retry"
                    );
                    self.wait_for_lock_release(lock);
                    let second = self.agent.run(&self.flags, report_path);
                    if let Err(result) = self.exit_code_of(&second) {
                        return result;
                    }
                    second
                }
                _ => first,
            }
        };

        let exit_code = last.exit_code.unwrap_or(UNKNOWN_AGENT_EXIT);
        report::read_result(report_path, exit_code, last.started_at)
    }

    fn exit_code_of(&self, outcome: &AgentRunOutcome) -> Result<i32, RunResult> {
        outcome.exit_code.ok_or_else(|| {
            let err = RunnerError::FailedToStart {
                program: self.agent.program().to_path_buf(),
                reason: outcome
                    .start_error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            };
            RunResult::from_error(UNKNOWN_AGENT_EXIT, &err)
        })
    }

    /// Poll until `lock` disappears or the wait bound is hit.
    fn wait_for_lock_release(&self, lock: &Path) {
        let start = Instant::now();
        while lock.exists() {
            if start.elapsed() >= self.lock_wait.max_wait {
                warn!(
                    lock = %lock.display(),
                    waited_ms = start.elapsed().as_millis() as u64,
                    "lock still held; retrying anyway"
                );
                return;
            }
            std::thread::sleep(self.lock_wait.poll_interval);
        }
        info!(waited_ms = start.elapsed().as_millis() as u64, "lock released");
    }
}

fn lock_present(lock: Option<&Path>) -> bool {
    lock.is_some_and(Path::exists)
}
