//! Agent subprocess executor.
//!
//! Executes `<puppet> agent ...` and waits for it. A non-zero exit is a
//! normal outcome here; only a failure to spawn is reported as such.

use crate::agent::{AgentSettings, EnvFixups};
use crate::config::RunConfig;
use crate::exit_codes::UNKNOWN_AGENT_EXIT;
use crate::flags::FlagSet;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Instant, SystemTime};
use tracing::{debug, info, warn};

/// Subcommand token for performing an agent run.
const AGENT_SUBCOMMAND: &str = "agent";

/// Result of one agent invocation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRunOutcome {
    /// Exit code of the agent (None if it could not be started).
    pub exit_code: Option<i32>,
    /// Report modification time captured just before the run started
    /// (None if there was no report yet).
    pub started_at: Option<SystemTime>,
    /// Why the process could not be started.
    pub start_error: Option<String>,
}

impl AgentRunOutcome {
    pub fn failed_to_start(&self) -> bool {
        self.exit_code.is_none()
    }
}

/// Modification time of a file, or None if it cannot be read.
pub fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// The Puppet executable plus the environment it runs with.
#[derive(Debug, Clone)]
pub struct PuppetAgent {
    program: PathBuf,
    env: EnvFixups,
}

impl PuppetAgent {
    pub fn new(config: &RunConfig, env: EnvFixups) -> Self {
        if !env.is_empty() {
            debug!(fixups = ?env, "agent environment fix-ups");
        }
        Self {
            program: config.puppet_bin.clone(),
            env,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether the configured executable exists.
    pub fn is_installed(&self) -> bool {
        self.program.exists()
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(AGENT_SUBCOMMAND)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in self.env.iter() {
            command.env(key, value);
        }
        command
    }

    /// Ask the agent where its report and lock files live.
    ///
    /// Any failure yields empty settings; the caller decides what a
    /// missing path means.
    pub fn query_settings(&self) -> AgentSettings {
        let output = match self
            .command()
            .arg("--configprint")
            .arg(AgentSettings::configprint_arg())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!(program = %self.program.display(), error = %e, "failed to query agent settings");
                return AgentSettings::default();
            }
        };

        if !output.status.success() {
            warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "agent settings query exited unsuccessfully"
            );
            return AgentSettings::default();
        }

        let settings = AgentSettings::parse(&String::from_utf8_lossy(&output.stdout));
        debug!(?settings, "agent settings");
        settings
    }

    /// Run the agent once with `flags`.
    ///
    /// The report's modification time is captured before spawning so a
    /// later check can tell whether this run wrote a new report.
    pub fn run(&self, flags: &FlagSet, report_path: &Path) -> AgentRunOutcome {
        let started_at = file_mtime(report_path);

        info!(program = %self.program.display(), flags = %flags, "starting Puppet agent run");
        let start = Instant::now();

        let output = match self.command().args(flags.iter()).output() {
            Ok(output) => output,
            Err(e) => {
                warn!(program = %self.program.display(), error = %e, "failed to start Puppet agent");
                return AgentRunOutcome {
                    exit_code: None,
                    started_at,
                    start_error: Some(e.to_string()),
                };
            }
        };

        log_stream("stdout", &output.stdout);
        log_stream("stderr", &output.stderr);

        let exit_code = exit_code_of(output.status);
        info!(
            exit_code,
            duration_ms = start.elapsed().as_millis() as u64,
            "Puppet agent run finished"
        );

        AgentRunOutcome {
            exit_code: Some(exit_code),
            started_at,
            start_error: None,
        }
    }
}

/// Map an exit status to an integer code.
///
/// On Unix a signal-terminated process reports `128 + signal`.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    UNKNOWN_AGENT_EXIT
}

fn log_stream(stream: &str, bytes: &[u8]) {
    for line in String::from_utf8_lossy(bytes).lines() {
        debug!(stream, "{}", line);
    }
}
