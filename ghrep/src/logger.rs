// ghrep/src/logger.rs
//! Logger setup for the ghrep binary.
//!
//! License: MIT OR Apache-2.0

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes `env_logger` on stderr.
///
/// An explicit `level` overrides `RUST_LOG`; without one, `RUST_LOG` is
/// honoured and falls back to `warn`. Calling this twice is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.target(Target::Stderr).format_timestamp(None);
    let _ = builder.try_init();
}

/// Picks the level from the `--quiet` and `--debug` flags. Quiet wins.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
