//! Configuration loading and CLI override logic.

use std::path::PathBuf;

use anyhow::Result;
use imagenet_core::{ProfilePlan, resolve_networks};
use imagenet_utils::{ProfileSettings, normalize_path};
use log::info;

use crate::args::ProfileArgs;

/// Load profiler settings from a file or use defaults.
pub fn load_settings(config_path: Option<&PathBuf>) -> Result<ProfileSettings> {
    match config_path {
        Some(path) => {
            let resolved = normalize_path(path)?;
            let settings = ProfileSettings::load_from_path(&resolved)?;
            info!("Loaded settings from {}", resolved.display());
            Ok(settings)
        }
        None => Ok(ProfileSettings::default()),
    }
}

/// Apply command-line arguments on top of loaded or default settings.
pub fn apply_cli_overrides(settings: &mut ProfileSettings, args: &ProfileArgs) {
    if let Some(precision) = args.precision.as_ref() {
        settings.precision = precision.trim().to_string();
    }
    if let Some(count) = args.repeat_count {
        settings.repeat_count = count;
    }
    if let Some(count) = args.warmup_images {
        settings.warmup_images = count;
    }
    if let Some(path) = args.manifest.as_ref() {
        settings.manifest = path.clone();
    }
    if let Some(path) = args.image_dir.as_ref() {
        settings.image_dir = path.clone();
    }
    if let Some(path) = args.model_dir.as_ref() {
        settings.model_dir = path.clone();
    }
    if let Some(path) = args.output_root.as_ref() {
        settings.output_root = path.clone();
    }
    if let Some(ms) = args.settle_delay_ms {
        settings.settle_delay_ms = ms;
    }
    if let Some(ms) = args.aggregate_delay_ms {
        settings.aggregate_delay_ms = ms;
    }
    settings.sanitize();
}

/// Resolve the network selection and combine it with the effective settings.
pub fn build_plan(settings: &ProfileSettings, args: &ProfileArgs) -> Result<ProfilePlan> {
    let networks = resolve_networks(&args.network)?;
    Ok(ProfilePlan::new(networks, args.profile, &args.gpu, settings))
}
