//! Contract between the profiler and a classification engine.
//!
//! The profiler never looks inside an engine. It constructs one classifier per
//! network, feeds it images, waits for the device to go idle and then reads
//! the timings the engine recorded for its last call.

use anyhow::Result;
use image::DynamicImage;

use crate::network::Network;

/// Top-1 prediction of a single classification call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub class_index: usize,
    pub confidence: f32,
}

/// Factory for network-bound classifiers.
pub trait Engine {
    type Model: Classifier;

    fn name(&self) -> &'static str;

    /// Load the network. This is the slow, failure-prone step; errors are fatal.
    fn load(&self, network: Network) -> Result<Self::Model>;
}

/// A classifier bound to one network.
pub trait Classifier {
    fn classify(&mut self, image: &DynamicImage) -> Result<Classification>;

    /// Device execution time of the last call, in milliseconds.
    fn network_time_ms(&self) -> f32;

    /// Host-side total time of the last call (pre/post-processing included), in milliseconds.
    fn cpu_total_time_ms(&self) -> f32;

    fn class_desc(&self, class_index: usize) -> Option<&str>;

    /// Block until all outstanding device work has finished.
    ///
    /// Timings must only be read after this returns.
    fn synchronize(&self) -> Result<()>;
}
