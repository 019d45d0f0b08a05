//! Shared helpers for tests that need a stand-in Puppet executable.

use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script named `puppet` into `dir`.
///
/// `body` is the script after the shebang; `$1` is the `agent` subcommand.
#[cfg(unix)]
pub(crate) fn write_fake_puppet(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("puppet");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A fake Puppet that answers `--configprint` with paths under `state`.
///
/// Runs execute `run_body`.
#[cfg(unix)]
pub(crate) fn write_configured_puppet(dir: &Path, state: &Path, run_body: &str) -> PathBuf {
    write_fake_puppet(
        dir,
        &format!(
            "if [ \"$2\" = \"--configprint\" ]; then\n\
             echo 'lastrunreport = {state}/last_run_report.yaml'\n\
             echo 'agent_disabled_lockfile = {state}/agent_disabled.lock'\n\
             echo 'agent_catalog_run_lockfile = {state}/agent_catalog_run.lock'\n\
             exit 0\n\
             fi\n\
             {run_body}",
            state = state.display(),
            run_body = run_body
        ),
    )
}
