//! Lightweight timing utilities for optional performance tracing.
//!
//! A [`TimingGuard`] records the elapsed duration of a scoped operation and
//! logs it on target `imagenet::telemetry` when dropped. Guards are inert when
//! that target is filtered out, e.g. enable them with
//! `RUST_LOG=info,imagenet::telemetry=debug`.

use std::{
    borrow::Cow,
    time::{Duration, Instant},
};

use log::{Level, log, log_enabled};

/// Log target used by every timing guard.
pub const TELEMETRY_TARGET: &str = "imagenet::telemetry";

/// RAII helper that logs how long an operation took when dropped.
pub struct TimingGuard {
    label: Cow<'static, str>,
    level: Level,
    start: Instant,
    active: bool,
}

impl TimingGuard {
    /// Consume the guard and return the elapsed duration without logging.
    pub fn finish(mut self) -> Duration {
        self.active = false;
        self.start.elapsed()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if self.active {
            log!(
                target: TELEMETRY_TARGET,
                self.level,
                "{} completed in {:.2?}",
                self.label,
                self.start.elapsed()
            );
        }
    }
}

/// Create a timing guard that logs at `level` when the telemetry target allows it.
pub fn timing_guard(label: impl Into<Cow<'static, str>>, level: Level) -> TimingGuard {
    TimingGuard {
        label: label.into(),
        level,
        start: Instant::now(),
        active: log_enabled!(target: TELEMETRY_TARGET, level),
    }
}
