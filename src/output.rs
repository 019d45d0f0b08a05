//! Delivery of the result to the caller.
//!
//! Without output files the result goes to stdout and logs to stderr.
//! With output files, both are redirected and the runner's exit status is
//! written to the exit code file as the very last step.
//!
//! `OutputSink` is a guard: if it is dropped before [`OutputSink::finish`]
//! runs, it still records a failure exit status so the caller is never
//! left waiting on a missing exit code file.

use crate::exit_codes::{RUN_FAILURE, SUCCESS};
use crate::fs::atomic_write;
use crate::request::OutputFiles;
use crate::result::RunResult;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Where the result, logs and exit status go.
#[derive(Debug)]
pub struct OutputSink {
    redirect: Option<Redirect>,
    finished: bool,
}

#[derive(Debug)]
struct Redirect {
    files: OutputFiles,
    stdout: File,
    stderr: File,
}

impl OutputSink {
    /// Use the process's own stdout and stderr.
    pub fn stdio() -> Self {
        Self {
            redirect: None,
            finished: false,
        }
    }

    /// Create the caller's stdout and stderr files.
    ///
    /// # Errors
    ///
    /// Fails if either file cannot be created.
    pub fn open(files: OutputFiles) -> Result<Self> {
        let stdout = File::create(&files.stdout)
            .with_context(|| format!("failed to create stdout file '{}'", files.stdout.display()))?;
        let stderr = File::create(&files.stderr)
            .with_context(|| format!("failed to create stderr file '{}'", files.stderr.display()))?;

        Ok(Self {
            redirect: Some(Redirect {
                files,
                stdout,
                stderr,
            }),
            finished: false,
        })
    }

    /// Writer for diagnostics: the stderr file, or the process stderr.
    pub fn log_writer(&self) -> BoxMakeWriter {
        match self.redirect.as_ref().map(|r| r.stderr.try_clone()) {
            Some(Ok(file)) => BoxMakeWriter::new(Mutex::new(file)),
            _ => BoxMakeWriter::new(std::io::stderr),
        }
    }

    /// Emit the result and record the exit status.
    ///
    /// Returns the process exit status for the result.
    ///
    /// # Errors
    ///
    /// Fails if the result or exit status cannot be written.
    pub fn finish(mut self, result: &RunResult) -> Result<i32> {
        let code = if result.is_error() { RUN_FAILURE } else { SUCCESS };
        let json = result.to_json();

        match self.redirect.as_mut() {
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", json)
                    .and_then(|_| stdout.flush())
                    .context("failed to write result to stdout")?;
            }
            Some(redirect) => {
                writeln!(redirect.stdout, "{}", json)
                    .and_then(|_| redirect.stdout.sync_all())
                    .with_context(|| {
                        format!(
                            "failed to write result to '{}'",
                            redirect.files.stdout.display()
                        )
                    })?;
                write_exitcode(&redirect.files, code)?;
            }
        }

        self.finished = true;
        Ok(code)
    }
}

impl Drop for OutputSink {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(redirect) = &self.redirect
            && let Err(e) = write_exitcode(&redirect.files, RUN_FAILURE)
        {
            warn!(error = %format!("{:#}", e), "failed to record exit status");
        }
    }
}

fn write_exitcode(files: &OutputFiles, code: i32) -> Result<()> {
    atomic_write(&files.exitcode, format!("{}\n", code).as_bytes()).with_context(|| {
        format!(
            "failed to write exit code file '{}'",
            files.exitcode.display()
        )
    })
}
