// ABOUTME: tracing subscriber setup shared by the newsgrab and wp-extract binaries.
// ABOUTME: Logs go to stderr; RUST_LOG wins over the verbosity flag when set.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber.
///
/// Without `RUST_LOG` the level is `info`, or `debug` when `verbose` is set.
/// Calling it twice is harmless; the second install is ignored.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
