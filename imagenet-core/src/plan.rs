use std::{path::PathBuf, time::Duration};

use imagenet_utils::ProfileSettings;

use crate::network::Network;

/// Fully resolved description of one profiler invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePlan {
    pub networks: Vec<Network>,
    /// Measure, persist and aggregate; otherwise only warm up.
    pub profile: bool,
    pub gpu: String,
    pub precision: String,
    pub model_type: String,
    pub output_root: PathBuf,
    pub repeat_count: usize,
    pub warmup_images: usize,
    pub settle_delay: Duration,
    pub aggregate_delay: Duration,
}

impl ProfilePlan {
    pub fn new(
        networks: Vec<Network>,
        profile: bool,
        gpu: impl Into<String>,
        settings: &ProfileSettings,
    ) -> Self {
        Self {
            networks,
            profile,
            gpu: gpu.into(),
            precision: settings.precision.clone(),
            model_type: settings.model_type.clone(),
            output_root: settings.output_root.clone(),
            repeat_count: settings.repeat_count.max(1),
            warmup_images: settings.warmup_images,
            settle_delay: settings.settle_delay(),
            aggregate_delay: settings.aggregate_delay(),
        }
    }

    /// `<root>/<precision>/runtime/<gpu>_runtime_<type>_<network>_<precision>.csv`
    pub fn runtime_table_path(&self, network: Network) -> PathBuf {
        self.output_root
            .join(&self.precision)
            .join("runtime")
            .join(format!(
                "{}_runtime_{}_{}_{}.csv",
                self.gpu, self.model_type, network, self.precision
            ))
    }

    /// `<root>/<precision>/results/<gpu>_average_runtime_<type>_<network>_<precision>.csv`
    pub fn summary_table_path(&self, network: Network) -> PathBuf {
        self.output_root
            .join(&self.precision)
            .join("results")
            .join(format!(
                "{}_average_runtime_{}_{}_{}.csv",
                self.gpu, self.model_type, network, self.precision
            ))
    }
}
