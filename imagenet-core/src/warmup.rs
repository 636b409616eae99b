use anyhow::Result;
use imagenet_utils::{load_image, timing_guard};
use log::{debug, info};

use crate::{engine::Classifier, manifest::ImageSet};

/// Outcome of a warm-up pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmupReport {
    pub attempted: usize,
    pub succeeded: usize,
}

/// Classify the first `count` manifest images and discard the results.
///
/// A failing image never stops the pass; it is logged at debug level and
/// skipped.
pub fn warm_up<C: Classifier>(model: &mut C, images: &ImageSet, count: usize) -> WarmupReport {
    let _guard = timing_guard("imagenet_core::warm_up", log::Level::Debug);
    let mut report = WarmupReport::default();
    for name in images.names().iter().take(count) {
        report.attempted += 1;
        match warm_up_one(model, images, name) {
            Ok(()) => report.succeeded += 1,
            Err(err) => debug!("warm-up on {name} failed: {err:#}"),
        }
    }
    info!(
        "Warm-up finished: {}/{} image(s) classified",
        report.succeeded, report.attempted
    );
    report
}

fn warm_up_one<C: Classifier>(model: &mut C, images: &ImageSet, name: &str) -> Result<()> {
    let image = load_image(images.path_of(name))?;
    let prediction = model.classify(&image)?;
    model.synchronize()?;
    let exe_time = model.network_time_ms();
    let overall_time = model.cpu_total_time_ms();
    let class_desc = model.class_desc(prediction.class_index).unwrap_or("<unknown>");
    info!(
        "class_desc: {class_desc}; confidence: {:.4}",
        prediction.confidence
    );
    info!("exe_time: {exe_time:.3}; overall_time: {overall_time:.3}");
    Ok(())
}
