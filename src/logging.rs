//! Diagnostic logging to stderr.
//!
//! Priority: RUST_LOG > --debug > -v count > "warn". Match output on stdout
//! is not routed through tracing.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Filter directive for the given flags, ignoring RUST_LOG
pub fn level_for(debug: bool, verbose: u8, quiet: bool) -> &'static str {
    if debug {
        "debug"
    } else if quiet {
        "error"
    } else {
        match verbose {
            0 => DEFAULT_LOG_LEVEL,
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

pub fn init(debug: bool, verbose: u8, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level_for(debug, verbose, quiet))
    };

    // try_init: a subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Logging initialised");
}
