//! Reading the agent's last run report into a result.
//!
//! The report is only trusted if the run that just finished wrote it: its
//! modification time must differ from the one captured before that run.

mod model;


pub use model::RunReport;

use crate::agent::file_mtime;
use crate::error::{Result, RunnerError};
use crate::result::RunResult;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Turn a finished run into its result.
///
/// `prior_mtime` is the report's modification time captured just before
/// the run that produced `exit_code`.
pub fn read_result(report_path: &Path, exit_code: i32, prior_mtime: Option<SystemTime>) -> RunResult {
    let report = match load_fresh_report(report_path, prior_mtime) {
        Ok(report) => report,
        Err(e) => {
            warn!(report = %report_path.display(), error = %e, "no usable run report");
            return RunResult::from_error(exit_code, &e);
        }
    };

    let mut result = if exit_code == 0 {
        RunResult::success(exit_code)
    } else {
        RunResult::from_error(exit_code, &RunnerError::NonZeroExit(exit_code))
    };
    apply_report(&mut result, &report);
    result
}

fn load_fresh_report(path: &Path, prior_mtime: Option<SystemTime>) -> Result<RunReport> {
    if !path.exists() {
        return Err(RunnerError::ReportMissing(path.to_path_buf()));
    }

    let mtime = file_mtime(path);
    debug!(
        mtime = %rfc3339(mtime),
        prior_mtime = %rfc3339(prior_mtime),
        "report modification times"
    );
    if prior_mtime.is_some() && mtime == prior_mtime {
        return Err(RunnerError::ReportUnchanged(path.to_path_buf()));
    }

    RunReport::load(path)
}

fn rfc3339(time: Option<SystemTime>) -> String {
    time.map(|t| DateTime::<Utc>::from(t).to_rfc3339())
        .unwrap_or_else(|| "none".to_string())
}

/// Overlay the report's descriptive fields; classification is untouched.
fn apply_report(result: &mut RunResult, report: &RunReport) {
    let fields = [
        (&mut result.time, &report.time),
        (&mut result.transaction_uuid, &report.transaction_uuid),
        (&mut result.environment, &report.environment),
        (&mut result.status, &report.status),
    ];
    for (slot, value) in fields {
        if let Some(value) = value {
            *slot = value.clone();
        }
    }
    result.metrics = report.resource_metrics();
}
