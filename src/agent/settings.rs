//! Agent settings lookup via `puppet agent --configprint`.

use std::path::PathBuf;

pub const LAST_RUN_REPORT: &str = "lastrunreport";
pub const DISABLED_LOCKFILE: &str = "agent_disabled_lockfile";
pub const CATALOG_RUN_LOCKFILE: &str = "agent_catalog_run_lockfile";

/// Paths the runner needs from the agent's own configuration.
///
/// An unset or empty setting is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentSettings {
    pub last_run_report: Option<PathBuf>,
    pub disabled_lock: Option<PathBuf>,
    pub catalog_run_lock: Option<PathBuf>,
}

impl AgentSettings {
    /// The `--configprint` argument requesting every needed setting.
    pub fn configprint_arg() -> String {
        [LAST_RUN_REPORT, DISABLED_LOCKFILE, CATALOG_RUN_LOCKFILE].join(",")
    }

    /// Parse `name = value` lines printed by `--configprint`.
    ///
    /// Unrecognized lines are ignored.
    pub fn parse(output: &str) -> Self {
        let mut settings = Self::default();

        for line in output.lines() {
            let Some((name, value)) = line.split_once(" = ") else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match name.trim() {
                LAST_RUN_REPORT => &mut settings.last_run_report,
                DISABLED_LOCKFILE => &mut settings.disabled_lock,
                CATALOG_RUN_LOCKFILE => &mut settings.catalog_run_lock,
                _ => continue,
            };
            *slot = Some(PathBuf::from(value));
        }

        settings
    }
}
