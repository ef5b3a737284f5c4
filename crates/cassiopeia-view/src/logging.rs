//! Log setup for the command-line host.
//!
//! `RUST_LOG` takes precedence; otherwise the level follows `-v`.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter directive for a verbosity count.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Installs a stderr subscriber. Does nothing if one is already set.
pub fn init(verbose: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
