//! The single output record returned to the caller.
//!
//! Every exit path funnels through [`RunResult::success`] or
//! [`RunResult::failure`], so the schema is complete even when the run
//! never started.

use crate::error::{ErrorKind, RunnerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version of [`RunResult`].
pub const RESULT_VERSION: u32 = 1;

/// Placeholder for fields the run did not report.
pub const UNKNOWN: &str = "unknown";

/// Outcome of one orchestration pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub time: String,
    pub transaction_uuid: String,
    pub environment: String,
    pub status: String,
    pub metrics: BTreeMap<String, serde_json::Value>,
    pub exitcode: i32,
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    /// A success-shaped result with placeholder descriptive fields.
    pub fn success(exitcode: i32) -> Self {
        Self {
            time: UNKNOWN.to_string(),
            transaction_uuid: UNKNOWN.to_string(),
            environment: UNKNOWN.to_string(),
            status: UNKNOWN.to_string(),
            metrics: BTreeMap::new(),
            exitcode,
            version: RESULT_VERSION,
            error_type: None,
            error: None,
        }
    }

    /// A failure result classified as `kind`.
    pub fn failure(exitcode: i32, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error_type: Some(kind),
            error: Some(message.into()),
            ..Self::success(exitcode)
        }
    }

    /// A failure result built from an internal error.
    pub fn from_error(exitcode: i32, err: &RunnerError) -> Self {
        Self::failure(exitcode, err.kind(), err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Serialize to the wire JSON representation.
    pub fn to_json(&self) -> String {
        // Only strings, integers and JSON values: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
