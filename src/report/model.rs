//! Typed view of the agent's last run report.
//!
//! The report is YAML written by the agent and usually carries Ruby object
//! tags (`!ruby/object:Puppet::Transaction::Report`). Tags are stripped
//! before decoding. Only the fields the result needs are modelled; any
//! other field is ignored and any modelled field may be absent.

use crate::error::{Result, RunnerError};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// The subset of a run report the runner reports back.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunReport {
    #[serde(deserialize_with = "lenient_string")]
    pub time: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub transaction_uuid: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub environment: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    pub metrics: Option<Value>,
}

impl RunReport {
    /// Load and decode a report file.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::ReportUnreadable` if the file cannot be read
    /// or is not a YAML mapping.
    pub fn load(path: &Path) -> Result<Self> {
        let unreadable = |reason: String| RunnerError::ReportUnreadable {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        Self::from_yaml(&content).map_err(unreadable)
    }

    /// Decode report YAML.
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, String> {
        let document: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        let document = strip_tags(document);
        if !document.is_mapping() {
            return Err("report is not a YAML mapping".to_string());
        }
        serde_yaml::from_value(document).map_err(|e| e.to_string())
    }

    /// Flatten `metrics.resources.values` into name → value.
    ///
    /// Entries are `[name, label, value]` lists; entries without a usable
    /// name or value are skipped.
    pub fn resource_metrics(&self) -> BTreeMap<String, serde_json::Value> {
        let values = self
            .metrics
            .as_ref()
            .and_then(|m| m.get("resources"))
            .and_then(|r| r.get("values"))
            .and_then(Value::as_sequence);

        let Some(values) = values else {
            return BTreeMap::new();
        };

        values
            .iter()
            .filter_map(Value::as_sequence)
            .filter(|entry| entry.len() >= 2)
            .filter_map(|entry| {
                let name = entry.first().and_then(scalar_to_string)?;
                let value = entry.last().and_then(scalar_to_json)?;
                Some((name, value))
            })
            .collect()
    }
}

/// Recursively drop YAML tags, keeping the tagged values.
fn strip_tags(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => strip_tags(tagged.value),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(strip_tags).collect()),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (strip_tags(k), strip_tags(v)))
                .collect(),
        ),
        other => other,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_to_json(value: &Value) -> Option<serde_json::Value> {
    match value {
        Value::Number(_) | Value::String(_) | Value::Bool(_) => serde_json::to_value(value)
            .ok()
            .filter(|v| !v.is_null()),
        _ => None,
    }
}

/// Accept any scalar as a string; anything else reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}
