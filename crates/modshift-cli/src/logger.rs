//! Logging setup for the modshift CLI.
//!
//! The core crate logs through `tracing`: per-file and per-pass events at
//! debug level, individual rule matches at trace level, entry-point writes at
//! info level. This module installs the subscriber that prints them.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `--verbose`, `--quiet` nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "modshift_core=info,modshift_cli=info";

/// Build the level filter for the given flags.
///
/// The level is determined in this order:
/// 1. `--verbose`: debug for modshift crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. [`DEFAULT_FILTER`]
pub fn filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("modshift_core=debug,modshift_cli=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber. Call once, before any logging.
///
/// ```rust,no_run
/// use modshift_cli::logger::init_logger;
///
/// // Debug logging without colors
/// init_logger(true, false, true);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}
