//! Config construction and validation.

use super::model::RunConfig;
use crate::error::{Result, RunnerError};
use serde_json::Value;

impl RunConfig {
    /// Merge a caller `configuration` object over the defaults.
    ///
    /// `None` and `null` both mean "no overrides".
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::InvalidInput` if the overrides are not an
    /// object, a known key has the wrong type, or the result is invalid.
    pub fn from_overrides(overrides: Option<&Value>) -> Result<Self> {
        let config = match overrides {
            None | Some(Value::Null) => RunConfig::default(),
            Some(value @ Value::Object(_)) => {
                serde_json::from_value(value.clone()).map_err(|e| {
                    RunnerError::InvalidInput(format!("invalid configuration: {}", e))
                })?
            }
            Some(other) => {
                return Err(RunnerError::InvalidInput(format!(
                    "configuration must be an object, got: {}",
                    other
                )));
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// `puppet_bin` must be non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.puppet_bin.as_os_str().is_empty() {
            return Err(RunnerError::InvalidInput(
                "invalid configuration: puppet_bin must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
