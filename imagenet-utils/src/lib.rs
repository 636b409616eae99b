//! Common helpers shared across the profiler crates.

/// Profiler settings file (paths, repetition counts, delays).
pub mod config;
/// Image loading, resizing, and tensor layout conversion.
pub mod image_utils;
/// Rounding and decimal formatting for persisted timings.
pub mod numeric;
/// Instrumentation helpers for optional performance tracing.
pub mod telemetry;

use std::path::Path;

use anyhow::Result;
use log::LevelFilter;

pub use config::ProfileSettings;
pub use image_utils::{load_image, resize_image, rgb_to_normalized_chw};
pub use numeric::{format_decimal, mean, round_to};
pub use telemetry::{TimingGuard, timing_guard};

/// Initialize logging once for the CLI and for tests.
///
/// This function respects the `RUST_LOG` environment variable if it is set.
/// Otherwise, it falls back to the provided default filter level.
pub fn init_logging(default_filter: LevelFilter) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter.as_str()),
    );
    builder.format_timestamp_millis();

    if builder.try_init().is_err() {
        // Logger already initialized; nothing to do.
    }
    Ok(())
}

/// Validate that a path exists and resolve it to an absolute path.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> Result<std::path::PathBuf> {
    let path = path.as_ref();
    anyhow::ensure!(path.exists(), "path does not exist: {}", path.display());
    Ok(path.canonicalize()?)
}
