//! Caller request decoding.
//!
//! The caller sends one JSON object on stdin:
//!
//! ```json
//! {
//!   "configuration": { "puppet_bin": "/opt/puppetlabs/bin/puppet" },
//!   "input": { "flags": ["--noop"], "job": "1234" },
//!   "output_files": { "stdout": "...", "stderr": "...", "exitcode": "..." }
//! }
//! ```
//!
//! `output_files` is decoded separately from the rest so that a request
//! with a bad `input` still has its result delivered where it was asked.

use crate::error::{Result, RunnerError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Where the caller wants the result, logs and exit status written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFiles {
    pub stdout: PathBuf,
    pub stderr: PathBuf,
    pub exitcode: PathBuf,
}

/// The `input` object of a run request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub flags: Vec<String>,
    #[serde(default)]
    pub job: Option<String>,
}

/// A decoded request envelope.
#[derive(Debug, Clone)]
pub struct Request {
    pub output_files: Option<OutputFiles>,
    body: serde_json::Map<String, Value>,
}

impl Request {
    /// Decode the envelope of a raw request.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::InvalidInput` if the text is not a JSON object
    /// or `output_files` is present but malformed.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| RunnerError::InvalidInput(format!("invalid request JSON: {}", e)))?;

        let Value::Object(mut body) = value else {
            return Err(RunnerError::InvalidInput(
                "request must be a JSON object".to_string(),
            ));
        };

        let output_files = match body.remove("output_files") {
            None | Some(Value::Null) => None,
            Some(files) => Some(serde_json::from_value(files).map_err(|e| {
                RunnerError::InvalidInput(format!("invalid output_files: {}", e))
            })?),
        };

        Ok(Self { output_files, body })
    }

    /// The caller's configuration overrides, if any.
    pub fn configuration(&self) -> Option<&Value> {
        self.body.get("configuration")
    }

    /// Decode the `input` object.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::InvalidInput` if `input` is missing, `flags`
    /// is not an array of strings, or `job` is not a string.
    pub fn input(&self) -> Result<ActionInput> {
        let input = self
            .body
            .get("input")
            .ok_or_else(|| RunnerError::InvalidInput("request has no 'input'".to_string()))?;

        ActionInput::deserialize(input)
            .map_err(|e| RunnerError::InvalidInput(format!("invalid input: {}", e)))
    }
}
