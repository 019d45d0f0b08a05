//! Tracing subscriber setup.
//!
//! Diagnostics never go to stdout, which carries the result. They go to
//! stderr, or to the caller's stderr file when output is redirected.

use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Only the first call in a
/// process has any effect.
pub fn init_tracing(json: bool, level: Level, writer: BoxMakeWriter) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_ansi(false);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
