//! Latency profiling of ImageNet classification networks.
//!
//! The crate defines the engine contract, ships a `tract-onnx` engine, and
//! implements the measurement pipeline: warm-up, repeated timed
//! classification, runtime table persistence and per-image aggregation.

/// Classifier and engine traits.
pub mod engine;
/// Class description lookup.
pub mod labels;
/// Whitespace-separated image manifests.
pub mod manifest;
/// Repeated timed classification.
pub mod measure;
/// ONNX engine backed by `tract-onnx`.
pub mod model;
/// Supported network catalog and selection expansion.
pub mod network;
/// Per-network orchestration.
pub mod pipeline;
/// Resolved run configuration and output layout.
pub mod plan;
/// Image to tensor conversion.
pub mod preprocess;
/// Runtime and summary tables.
pub mod report;
/// Throwaway classifications before measuring.
pub mod warmup;

pub use engine::{Classification, Classifier, Engine};
pub use labels::ClassLabels;
pub use manifest::ImageSet;
pub use measure::{ImageResult, Sample, measure_images};
pub use model::{TractClassifier, TractEngine};
pub use network::{ALL_NETWORKS, Network, UnknownNetwork, catalog_listing, resolve_networks};
pub use pipeline::{profile_network, run_profile};
pub use plan::ProfilePlan;
pub use report::{
    NO_DATA, SummaryRow, aggregate_runtime_table, write_runtime_table, write_summary_table,
};
pub use warmup::{WarmupReport, warm_up};

/// Returns the crate version for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
