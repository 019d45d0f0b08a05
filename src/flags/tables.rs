//! Built-in flag tables.

use regex::Regex;
use std::sync::LazyLock;

/// Flags every run is forced to carry, in emission order.
const DEFAULT_FLAGS: &[&str] = &["--onetime", "--no-daemonize", "--verbose"];

/// Option names a caller may set or negate.
const OVERRIDABLE: &[&str] = &[
    "color",
    "configtimeout",
    "debug",
    "disable_warnings",
    "environment",
    "evaltrace",
    "filetimeout",
    "graph",
    "http_connect_timeout",
    "http_debug",
    "http_keepalive_timeout",
    "http_read_timeout",
    "log_level",
    "noop",
    "ordering",
    "pluginsync",
    "server_list",
    "show_diff",
    "skip_tags",
    "splay",
    "splaylimit",
    "strict_environment_mode",
    "summarize",
    "tags",
    "trace",
    "use_cached_catalog",
    "usecacheonfailure",
    "waitforcert",
];

/// The flag the runner appends to tag a run with its job.
pub const JOB_ID_FLAG: &str = "--job-id";

static BUILTIN: LazyLock<FlagTables> = LazyLock::new(FlagTables::builtin);

/// Immutable policy tables consulted by flag normalization.
pub struct FlagTables {
    pattern: Regex,
    defaults: Vec<(String, String)>,
    overridable: Vec<String>,
}

impl std::fmt::Debug for FlagTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagTables")
            .field("pattern", &self.pattern.as_str())
            .field("defaults", &self.defaults)
            .field("overridable", &self.overridable.len())
            .finish()
    }
}

impl FlagTables {
    /// The process-wide tables, built on first use.
    pub fn global() -> &'static FlagTables {
        &BUILTIN
    }

    fn builtin() -> Self {
        Self::new(DEFAULT_FLAGS, OVERRIDABLE)
    }

    /// Build tables from explicit default flags and overridable names.
    ///
    /// Each default flag must start with `--`; its base name becomes
    /// default-controlled.
    pub fn new(defaults: &[&str], overridable: &[&str]) -> Self {
        let defaults = defaults
            .iter()
            .map(|flag| (super::base_name(flag).to_string(), flag.to_string()))
            .collect();

        Self {
            pattern: Regex::new(r"^[A-Za-z0-9_:,.\-]+$").expect("flag pattern is a valid regex"),
            defaults,
            overridable: overridable.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Check a token against the permitted character class.
    pub fn is_well_formed(&self, token: &str) -> bool {
        self.pattern.is_match(token)
    }

    /// The required spelling of a default-controlled name, if it is one.
    pub fn default_for(&self, name: &str) -> Option<&str> {
        self.defaults
            .iter()
            .find(|(base, _)| base == name)
            .map(|(_, flag)| flag.as_str())
    }

    pub fn is_overridable(&self, name: &str) -> bool {
        self.overridable.iter().any(|n| n == name)
    }

    /// Default flags in emission order.
    pub fn default_flags(&self) -> impl Iterator<Item = &str> {
        self.defaults.iter().map(|(_, flag)| flag.as_str())
    }
}
