//! Static capability descriptor printed by `puppet-runner metadata`.

use serde_json::{Value, json};
use std::sync::LazyLock;

static METADATA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "description": "Runs the Puppet agent once and reports the outcome",
        "configuration": {
            "type": "object",
            "properties": {
                "puppet_bin": { "type": "string" }
            },
            "additionalProperties": true
        },
        "actions": [
            {
                "name": "run",
                "description": "Start a Puppet agent run",
                "input": {
                    "type": "object",
                    "properties": {
                        "flags": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "job": { "type": "string" }
                    },
                    "required": ["flags"]
                },
                "results": {
                    "type": "object",
                    "properties": {
                        "time": { "type": "string" },
                        "transaction_uuid": { "type": "string" },
                        "environment": { "type": "string" },
                        "status": { "type": "string" },
                        "metrics": { "type": "object" },
                        "exitcode": { "type": "integer" },
                        "version": { "type": "integer" },
                        "error_type": { "type": "string" },
                        "error": { "type": "string" }
                    },
                    "required": [
                        "time",
                        "transaction_uuid",
                        "environment",
                        "status",
                        "metrics",
                        "exitcode",
                        "version"
                    ]
                }
            }
        ]
    })
});

/// The capability descriptor.
pub fn descriptor() -> &'static Value {
    &METADATA
}

/// The descriptor as pretty-printed JSON.
pub fn render() -> String {
    serde_json::to_string_pretty(descriptor()).unwrap_or_default()
}
