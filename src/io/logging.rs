//! Logger setup for the command-line tool

use crate::io::configuration::{DEFAULT_LOG_FILTER, VERBOSE_LOG_FILTER};
use log::debug;

/// Filter used when `RUST_LOG` is not set
pub const fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    }
}

/// Install the global logger, honouring `RUST_LOG`
///
/// Calling this more than once is harmless; later calls keep the logger
/// that is already installed.
pub fn init(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter(verbose)),
    );
    builder.format_timestamp(None);
    if builder.try_init().is_err() {
        debug!("Logger already installed; keeping it");
    }
}
