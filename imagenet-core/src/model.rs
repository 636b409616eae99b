use std::{
    fmt::Write,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use image::DynamicImage;
use imagenet_utils::timing_guard;
use log::{debug, info, warn};
use tract_onnx::prelude::*;

use crate::{
    engine::{Classification, Classifier, Engine},
    labels::ClassLabels,
    network::Network,
    preprocess::preprocess_image,
};

type RunnableModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Name of the optional class description file inside the model directory.
pub const LABELS_FILE: &str = "labels.txt";

/// CPU engine that executes ONNX classification graphs with `tract-onnx`.
///
/// Graphs are looked up as `<model_dir>/<network>.onnx`.
#[derive(Debug, Clone)]
pub struct TractEngine {
    model_dir: PathBuf,
}

impl TractEngine {
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    fn load_labels(&self) -> ClassLabels {
        let path = self.model_dir.join(LABELS_FILE);
        if !path.exists() {
            debug!("No class labels at {}", path.display());
            return ClassLabels::default();
        }
        match ClassLabels::load(&path) {
            Ok(labels) => {
                if labels.is_empty() {
                    warn!("{} holds no class labels", path.display());
                }
                labels
            }
            Err(err) => {
                warn!("Ignoring unreadable class labels: {err:#}");
                ClassLabels::default()
            }
        }
    }
}

impl Engine for TractEngine {
    type Model = TractClassifier;

    fn name(&self) -> &'static str {
        "tract-onnx"
    }

    fn load(&self, network: Network) -> Result<Self::Model> {
        let _guard = timing_guard(format!("imagenet_core::load {network}"), log::Level::Debug);
        let path = self.model_dir.join(network.model_file_name());
        anyhow::ensure!(
            path.exists(),
            "model file for {network} not found: {}",
            path.display()
        );

        let resolution = network.input_resolution();
        let runnable = match load_runnable_model(&path, resolution, true) {
            Ok(model) => model,
            Err(opt_err) => {
                let mut chain_msg = String::new();
                for cause in opt_err.chain() {
                    let _ = writeln!(&mut chain_msg, "  - {cause}");
                }
                warn!(
                    "{} failed optimized load; falling back to decluttered graph.\nError chain:\n{}",
                    path.display(),
                    chain_msg.trim_end()
                );
                load_runnable_model(&path, resolution, false).with_context(|| {
                    format!("failed to load {network} from {}", path.display())
                })?
            }
        };

        let labels = self.load_labels();
        info!(
            "Loaded {network} from {} ({resolution}x{resolution}, {} labels)",
            path.display(),
            labels.len()
        );

        Ok(TractClassifier {
            network,
            runnable,
            labels,
            network_time_ms: 0.0,
            cpu_total_time_ms: 0.0,
        })
    }
}

fn load_runnable_model(path: &Path, resolution: u32, optimized: bool) -> Result<RunnableModel> {
    let side = resolution as usize;
    let model = tract_onnx::onnx()
        .model_for_path(path)
        .with_context(|| format!("failed to parse ONNX graph from {}", path.display()))?
        .with_input_fact(0, f32::fact([1, 3, side, side]).into())
        .map_err(|e| anyhow::anyhow!("unable to set input shape: {e}"))?;

    if optimized {
        model
            .into_optimized()
            .map_err(|e| anyhow::anyhow!("unable to optimize graph: {e}"))?
            .into_runnable()
            .map_err(|e| anyhow::anyhow!("unable to make graph runnable: {e}"))
    } else {
        model
            .into_typed()
            .map_err(|e| anyhow::anyhow!("unable to type-check graph: {e}"))?
            .into_decluttered()
            .map_err(|e| anyhow::anyhow!("unable to declutter graph: {e}"))?
            .into_runnable()
            .map_err(|e| anyhow::anyhow!("unable to make graph runnable: {e}"))
    }
}

/// A loaded network together with the timings of its last call.
pub struct TractClassifier {
    network: Network,
    runnable: RunnableModel,
    labels: ClassLabels,
    network_time_ms: f32,
    cpu_total_time_ms: f32,
}

impl std::fmt::Debug for TractClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TractClassifier")
            .field("network", &self.network)
            .field("labels", &self.labels.len())
            .finish()
    }
}

impl Classifier for TractClassifier {
    fn classify(&mut self, image: &DynamicImage) -> Result<Classification> {
        let total = Instant::now();
        let input = preprocess_image(image, self.network.input_resolution())?;

        let exec = Instant::now();
        let outputs = self
            .runnable
            .run(tvec![input.into()])
            .map_err(|e| anyhow::anyhow!("{} execution failed: {e}", self.network))?;
        let exec_elapsed = exec.elapsed();

        let output = outputs
            .first()
            .ok_or_else(|| anyhow::anyhow!("{} produced no outputs", self.network))?;
        let scores = output
            .as_slice::<f32>()
            .map_err(|e| anyhow::anyhow!("{} output is not f32: {e}", self.network))?;
        let classification = top1(scores)?;

        self.network_time_ms = exec_elapsed.as_secs_f32() * 1_000.0;
        self.cpu_total_time_ms = total.elapsed().as_secs_f32() * 1_000.0;
        Ok(classification)
    }

    fn network_time_ms(&self) -> f32 {
        self.network_time_ms
    }

    fn cpu_total_time_ms(&self) -> f32 {
        self.cpu_total_time_ms
    }

    fn class_desc(&self, class_index: usize) -> Option<&str> {
        self.labels.describe(class_index)
    }

    fn synchronize(&self) -> Result<()> {
        // tract runs on the calling thread; nothing is left in flight.
        Ok(())
    }
}

/// Pick the highest-scoring class and its confidence.
///
/// Scores that already form a probability vector are used as-is, raw logits
/// go through a softmax first.
pub(crate) fn top1(scores: &[f32]) -> Result<Classification> {
    let (class_index, &max) = scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .ok_or_else(|| anyhow::anyhow!("classifier produced an empty score vector"))?;

    let sum: f32 = scores.iter().sum();
    let is_distribution =
        scores.iter().all(|s| (0.0..=1.0).contains(s)) && (sum - 1.0).abs() < 1e-3;
    let confidence = if is_distribution {
        max
    } else {
        let denom: f32 = scores.iter().map(|s| (s - max).exp()).sum();
        1.0 / denom
    };

    Ok(Classification {
        class_index,
        confidence,
    })
}
