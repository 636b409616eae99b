//! Repeated, timed classification of every manifest image.

use std::{
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Result;
use imagenet_utils::{load_image, round_to, timing_guard};
use log::{debug, info, warn};

use crate::{engine::Classifier, manifest::ImageSet};

/// Device and host time of one successful repetition, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub network_ms: f64,
    pub cpu_ms: f64,
}

/// Timings gathered for one image.
///
/// Both sequences always hold one slot per repetition; a failed repetition
/// leaves `None` in its slot so later columns never shift.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResult {
    pub image: String,
    /// Wall-clock seconds since the Unix epoch, 3 decimals.
    pub start: f64,
    pub end: f64,
    pub network_times: Vec<Option<f64>>,
    pub cpu_times: Vec<Option<f64>>,
}

impl ImageResult {
    pub fn new(image: impl Into<String>, start: f64) -> Self {
        Self {
            image: image.into(),
            start,
            end: start,
            network_times: Vec::new(),
            cpu_times: Vec::new(),
        }
    }

    pub fn push(&mut self, sample: Option<Sample>) {
        self.network_times.push(sample.map(|s| s.network_ms));
        self.cpu_times.push(sample.map(|s| s.cpu_ms));
    }

    pub fn repetitions(&self) -> usize {
        self.network_times.len()
    }

    pub fn dropped(&self) -> usize {
        self.network_times.iter().filter(|t| t.is_none()).count()
    }
}

/// Classify every image `repeat_count` times and collect the timings.
///
/// The image is reloaded from disk for every repetition. Start and end
/// timestamps bracket the whole repetition loop of one image.
pub fn measure_images<C: Classifier>(
    model: &mut C,
    images: &ImageSet,
    repeat_count: usize,
) -> Vec<ImageResult> {
    let _guard = timing_guard("imagenet_core::measure_images", log::Level::Debug);
    let mut results = Vec::with_capacity(images.len());
    for name in images.names() {
        info!("start inferencing {name} ...");
        let path = images.path_of(name);
        let mut result = ImageResult::new(name.as_str(), unix_timestamp());
        for repetition in 0..repeat_count {
            match time_once(model, &path) {
                Ok(sample) => result.push(Some(sample)),
                Err(err) => {
                    debug!("repetition {repetition} on {name} failed: {err:#}");
                    result.push(None);
                }
            }
        }
        result.end = unix_timestamp();
        if result.dropped() > 0 {
            warn!(
                "{name}: {}/{} repetition(s) failed and were recorded as missing",
                result.dropped(),
                repeat_count
            );
        }
        info!("end inferencing {name} ...");
        results.push(result);
    }
    results
}

/// Load, classify, synchronize, then read the timings of one call.
pub fn time_once<C: Classifier>(model: &mut C, path: &Path) -> Result<Sample> {
    let image = load_image(path)?;
    model.classify(&image)?;
    model.synchronize()?;
    Ok(Sample {
        network_ms: round_to(f64::from(model.network_time_ms()), 2),
        cpu_ms: round_to(f64::from(model.cpu_total_time_ms()), 2),
    })
}

/// Current wall-clock time in seconds, rounded to milliseconds.
pub fn unix_timestamp() -> f64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();
    round_to(secs, 3)
}
